//! Capability identifiers and grant outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque identifier for an OS-mediated permission.
///
/// Capabilities are compared by value and carry no behavior of their own;
/// version gating and rationale text live in
/// [`ApplicabilityRules`](super::ApplicabilityRules) and
/// [`RationaleCatalog`](crate::services::RationaleCatalog).
///
/// # Examples
///
/// ```
/// use grantflow::domain::models::Capability;
///
/// let cap = Capability::camera();
/// assert_eq!(cap.as_str(), "camera");
/// assert_eq!(cap, Capability::new("camera"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(String);

impl Capability {
    /// Create a capability from an arbitrary identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Camera access.
    pub fn camera() -> Self {
        Self::new("camera")
    }

    /// Microphone / audio recording access.
    pub fn record_audio() -> Self {
        Self::new("record-audio")
    }

    /// Read access to shared external storage (superseded on newer platforms).
    pub fn read_external_storage() -> Self {
        Self::new("read-external-storage")
    }

    /// Write access to shared external storage (superseded on newer platforms).
    pub fn write_external_storage() -> Self {
        Self::new("write-external-storage")
    }

    /// Approximate location access.
    pub fn coarse_location() -> Self {
        Self::new("coarse-location")
    }

    /// Precise location access.
    pub fn fine_location() -> Self {
        Self::new("fine-location")
    }

    /// Location access while the app is in the background.
    pub fn background_location() -> Self {
        Self::new("background-location")
    }

    /// Posting user-visible notifications (newer platforms only).
    pub fn post_notifications() -> Self {
        Self::new("post-notifications")
    }

    /// Running a foreground service.
    pub fn foreground_service() -> Self {
        Self::new("foreground-service")
    }

    /// Running a location-typed foreground service (granted implicitly).
    pub fn foreground_service_location() -> Self {
        Self::new("foreground-service-location")
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Capability {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A platform API level used by applicability rules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct PlatformVersion(pub u32);

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The resolution state of a single capability within a stage.
///
/// A capability's outcome is created when its stage begins processing it and
/// is never revisited once it reaches a final state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityOutcome {
    /// Not yet resolved.
    Pending,
    /// Granted by the user or already held.
    Granted,
    /// Denied, but a rationale may still be shown before re-requesting.
    DeniedRetryable,
    /// Denied and rationale can no longer be shown; only a settings redirect
    /// can change the grant.
    DeniedPermanent,
    /// Skipped without a request (e.g. platform-version-gated).
    NotApplicable,
    /// The user refused or cancelled at a decision point.
    Abandoned,
}

impl CapabilityOutcome {
    /// Whether this outcome will never change again.
    pub const fn is_final(self) -> bool {
        !matches!(self, Self::Pending | Self::DeniedRetryable)
    }

    /// Whether this outcome counts as a favorable resolution.
    pub const fn is_favorable(self) -> bool {
        matches!(self, Self::Granted | Self::NotApplicable)
    }
}
