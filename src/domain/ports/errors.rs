//! Error type for platform collaborator operations.

use thiserror::Error;

/// Errors a platform collaborator may surface.
///
/// The engine never propagates these past a stage boundary: a failed grant
/// request is translated into a denial, and an unreadable manifest fails the
/// whole attempt with a `false` resolution.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("capability manifest unavailable: {0}")]
    ManifestUnavailable(String),

    #[error("grant request failed: {0}")]
    RequestFailed(String),
}
