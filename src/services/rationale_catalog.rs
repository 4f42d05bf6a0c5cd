//! Rationale texts shown before re-requesting a denied capability.

use std::collections::HashMap;

use crate::domain::models::Capability;

/// Text pair for one capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RationaleText {
    /// Shown while the capability can still be re-requested.
    pub requested: String,
    /// Shown once the capability has been permanently declined.
    pub permanently_declined: String,
}

impl RationaleText {
    /// Build a text pair.
    pub fn new(requested: impl Into<String>, permanently_declined: impl Into<String>) -> Self {
        Self {
            requested: requested.into(),
            permanently_declined: permanently_declined.into(),
        }
    }
}

/// Pure mapping from capability to user-facing rationale text.
///
/// Unknown capabilities yield an empty string; they must not crash a stage.
/// Hosts can replace the built-in copy per capability with [`with_text`].
///
/// [`with_text`]: RationaleCatalog::with_text
///
/// # Examples
///
/// ```
/// use grantflow::domain::models::Capability;
/// use grantflow::services::RationaleCatalog;
///
/// let catalog = RationaleCatalog::new();
/// assert!(catalog.describe(&Capability::camera(), false).contains("camera"));
/// assert!(catalog.describe(&Capability::new("unknown"), false).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RationaleCatalog {
    overrides: HashMap<Capability, RationaleText>,
}

impl RationaleCatalog {
    /// Catalog with the built-in texts only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text pair for one capability.
    #[must_use]
    pub fn with_text(mut self, capability: Capability, text: RationaleText) -> Self {
        self.overrides.insert(capability, text);
        self
    }

    /// The rationale for a capability, varying with whether the user has
    /// permanently declined it. Empty for unknown capabilities.
    pub fn describe(&self, capability: &Capability, permanently_declined: bool) -> String {
        if let Some(text) = self.overrides.get(capability) {
            return if permanently_declined {
                text.permanently_declined.clone()
            } else {
                text.requested.clone()
            };
        }
        builtin(capability, permanently_declined)
            .map(str::to_owned)
            .unwrap_or_default()
    }
}

fn builtin(capability: &Capability, permanently_declined: bool) -> Option<&'static str> {
    let text = match (capability.as_str(), permanently_declined) {
        ("camera", false) => "This app needs camera access to take photos and record video.",
        ("camera", true) => {
            "It seems you have repeatedly declined camera access. \
             You can only change this decision in the app settings."
        }
        ("record-audio", false) => "This app needs audio access to record voice notes.",
        ("record-audio", true) => {
            "It seems you have repeatedly declined audio access. \
             You can only change this decision in the app settings."
        }
        ("read-external-storage" | "write-external-storage", false) => {
            "This app needs storage access to save and load media files."
        }
        ("read-external-storage" | "write-external-storage", true) => {
            "It seems you have repeatedly declined storage access. \
             You can only change this decision in the app settings."
        }
        ("coarse-location", false) => {
            "This app needs coarse location access to provide approximate \
             location-based services."
        }
        ("coarse-location", true) => {
            "It seems you have repeatedly declined coarse location access. \
             You can only change this decision in the app settings."
        }
        ("fine-location" | "foreground-service-location", false) => {
            "This app needs fine location access to provide accurate \
             location-based services."
        }
        ("fine-location" | "foreground-service-location", true) => {
            "It seems you have repeatedly declined fine location access. \
             You can only change this decision in the app settings."
        }
        ("background-location", false) => {
            "This app needs background location access to provide \
             location-based services when the app is not in use."
        }
        ("background-location", true) => {
            "It seems you have repeatedly declined background location access. \
             You can only change this decision in the app settings."
        }
        ("post-notifications", false) => {
            "This app needs notification access to alert you of important updates."
        }
        ("post-notifications", true) => {
            "It seems you have repeatedly declined notification access. \
             You can only change this decision in the app settings."
        }
        _ => return None,
    };
    Some(text)
}
