//! Platform grants port - interface to the OS permission machinery.

use std::collections::HashMap;

use async_trait::async_trait;

use super::errors::PlatformError;
use crate::domain::models::{Capability, PlatformVersion};

/// Trait for the OS-side grant collaborator.
///
/// Implementations wrap whatever the host platform offers for querying and
/// requesting permissions. All request methods resolve when the user has
/// answered the system prompt. The engine treats these as single-writer
/// collaborators; no internal locking is required on its behalf.
#[async_trait]
pub trait PlatformGrants: Send + Sync {
    /// Read the app's static capability manifest.
    ///
    /// # Errors
    /// [`PlatformError::ManifestUnavailable`] if the manifest cannot be read.
    fn declared_capabilities(&self) -> Result<Vec<Capability>, PlatformError>;

    /// Whether the capability is currently granted.
    fn is_granted(&self, capability: &Capability) -> bool;

    /// Whether a rationale may still be shown for the capability.
    ///
    /// Given a prior denial, `false` means the user permanently declined and
    /// only a settings redirect can change the grant.
    fn can_show_rationale(&self, capability: &Capability) -> bool;

    /// The current platform API level, consulted by applicability rules.
    fn platform_version(&self) -> PlatformVersion;

    /// Prompt the user for all listed capabilities at once.
    ///
    /// Resolves to a per-capability grant map once the user has answered.
    ///
    /// # Errors
    /// [`PlatformError::RequestFailed`] if the prompt could not be issued.
    async fn request_batch(
        &self,
        capabilities: &[Capability],
    ) -> Result<HashMap<Capability, bool>, PlatformError>;

    /// Prompt the user for a single capability.
    ///
    /// # Errors
    /// [`PlatformError::RequestFailed`] if the prompt could not be issued.
    async fn request_single(&self, capability: &Capability) -> Result<bool, PlatformError>;

    /// Fire-and-forget navigation to the OS settings page for this app.
    fn open_settings(&self);
}
