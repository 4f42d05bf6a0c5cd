//! Domain errors for the grantflow negotiation engine.

use thiserror::Error;

use crate::domain::ports::PlatformError;

/// Domain-level errors that can occur during a negotiation attempt.
///
/// Protocol violations (`SignalAlreadyResolved`, `EmptyQueue`,
/// `AlreadyStarted`) indicate programming defects: they assert in debug
/// builds and are handled defensively in release builds, never crossing a
/// stage boundary.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("capability manifest is empty")]
    EmptyManifest,

    #[error("completion signal was already resolved")]
    SignalAlreadyResolved,

    #[error("pending queue is empty")]
    EmptyQueue,

    #[error("orchestrator instance was already started")]
    AlreadyStarted,

    #[error("invalid phase transition from {from} to {to}")]
    InvalidPhaseTransition { from: String, to: String },

    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Convenience alias for results carrying a [`DomainError`].
pub type DomainResult<T> = Result<T, DomainError>;
