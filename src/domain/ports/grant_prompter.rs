//! Grant prompter port - interface to the UI collaborator.
//!
//! The engine decides *when* a rationale or settings-redirect decision point
//! is reached; how the dialog is drawn belongs to the host.

use async_trait::async_trait;

/// The user's answer to a rationale dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RationaleChoice {
    /// Re-request the capability.
    Agree,
    /// Abandon the negotiation.
    Refuse,
}

/// The user's answer to a settings-redirect dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChoice {
    /// Navigate to the OS settings page.
    OpenSettings,
    /// Abandon the negotiation.
    Cancel,
}

/// Trait for the UI collaborator presenting grant decision points.
///
/// A dismissed dialog maps to [`RationaleChoice::Refuse`] /
/// [`SettingsChoice::Cancel`]; the methods themselves are infallible.
#[async_trait]
pub trait GrantPrompter: Send + Sync {
    /// Show a rationale for a denied capability; resolves with the user's
    /// choice.
    async fn present_rationale(&self, text: &str) -> RationaleChoice;

    /// Show a settings-redirect prompt for a permanently declined
    /// capability, explaining why only the settings page can change the
    /// grant; resolves with the user's choice.
    async fn present_settings_redirect(&self, text: &str) -> SettingsChoice;
}
