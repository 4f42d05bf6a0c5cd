//! Platform-version applicability rules.
//!
//! Some capabilities must never be requested on certain platform versions:
//! storage capabilities are superseded on newer platforms, notification
//! posting only exists above an API threshold, and a location-typed
//! foreground service is granted implicitly. A capability filtered out by a
//! rule is `NotApplicable` and never reaches the platform.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::capability::{Capability, PlatformVersion};

/// Storage capabilities are superseded at this API level and above.
const STORAGE_SUPERSEDED_AT: PlatformVersion = PlatformVersion(33);

/// Notification posting exists at this API level and above.
const NOTIFICATIONS_INTRODUCED_AT: PlatformVersion = PlatformVersion(33);

/// Version gate for a single capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ApplicabilityRule {
    /// The gated capability.
    pub capability: Capability,
    /// Lowest platform version (inclusive) on which the capability exists.
    #[serde(default)]
    pub min_version: Option<PlatformVersion>,
    /// Highest platform version (inclusive) on which the capability is
    /// still meaningful.
    #[serde(default)]
    pub max_version: Option<PlatformVersion>,
    /// Granted implicitly by the platform; never requested.
    #[serde(default)]
    pub implied_granted: bool,
}

impl ApplicabilityRule {
    fn permits(&self, version: PlatformVersion) -> bool {
        if self.implied_granted {
            return false;
        }
        if self.min_version.is_some_and(|min| version < min) {
            return false;
        }
        if self.max_version.is_some_and(|max| version > max) {
            return false;
        }
        true
    }
}

/// The rule set consulted before any capability is requested.
///
/// Capabilities without a rule are applicable on every platform version.
///
/// # Examples
///
/// ```
/// use grantflow::domain::models::{ApplicabilityRules, Capability, PlatformVersion};
///
/// let rules = ApplicabilityRules::default();
/// // Storage capabilities are superseded on API 33+.
/// assert!(!rules.is_applicable(&Capability::write_external_storage(), PlatformVersion(34)));
/// assert!(rules.is_applicable(&Capability::write_external_storage(), PlatformVersion(30)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicabilityRules(Vec<ApplicabilityRule>);

impl ApplicabilityRules {
    /// Build a rule set from explicit rules.
    pub fn new(rules: Vec<ApplicabilityRule>) -> Self {
        Self(rules)
    }

    /// A rule set with no gates; every capability is applicable.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Whether `capability` may be requested on `version`.
    pub fn is_applicable(&self, capability: &Capability, version: PlatformVersion) -> bool {
        let applicable = self
            .0
            .iter()
            .filter(|rule| rule.capability == *capability)
            .all(|rule| rule.permits(version));
        if !applicable {
            debug!(%capability, %version, "capability not applicable on this platform version");
        }
        applicable
    }
}

impl Default for ApplicabilityRules {
    /// Gates mirroring the standard mobile platform behavior: storage
    /// capabilities capped below the superseding release, notification
    /// posting gated to the release that introduced it, and the
    /// location-typed foreground service marked implicitly granted.
    fn default() -> Self {
        Self(vec![
            ApplicabilityRule {
                capability: Capability::read_external_storage(),
                min_version: None,
                max_version: Some(PlatformVersion(STORAGE_SUPERSEDED_AT.0 - 1)),
                implied_granted: false,
            },
            ApplicabilityRule {
                capability: Capability::write_external_storage(),
                min_version: None,
                max_version: Some(PlatformVersion(STORAGE_SUPERSEDED_AT.0 - 1)),
                implied_granted: false,
            },
            ApplicabilityRule {
                capability: Capability::post_notifications(),
                min_version: Some(NOTIFICATIONS_INTRODUCED_AT),
                max_version: None,
                implied_granted: false,
            },
            ApplicabilityRule {
                capability: Capability::foreground_service_location(),
                min_version: None,
                max_version: None,
                implied_granted: true,
            },
        ])
    }
}
