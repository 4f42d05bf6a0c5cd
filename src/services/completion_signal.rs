//! One-shot, externally resolvable boolean outcome.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::warn;

use crate::domain::errors::{DomainError, DomainResult};

/// A one-shot, externally resolvable future of a boolean outcome.
///
/// Created once per stage invocation and owned exclusively by it. Resolving
/// twice is a protocol violation: the second call asserts in debug builds
/// and returns [`DomainError::SignalAlreadyResolved`] without changing the
/// published value.
///
/// Any number of [`CompletionHandle`]s may await the outcome; all observe
/// the same value once resolved, and reading it repeatedly is idempotent.
/// No timeout is imposed here; callers that need one wrap the handle
/// externally.
#[derive(Debug)]
pub struct CompletionSignal {
    tx: watch::Sender<Option<bool>>,
    resolved: AtomicBool,
}

impl CompletionSignal {
    /// Create an unresolved signal.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx,
            resolved: AtomicBool::new(false),
        }
    }

    /// A new awaiter for this signal's outcome.
    pub fn handle(&self) -> CompletionHandle {
        CompletionHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// Publish the outcome.
    ///
    /// # Errors
    /// [`DomainError::SignalAlreadyResolved`] if the signal was resolved
    /// before; the previously published value is left untouched.
    pub fn resolve(&self, value: bool) -> DomainResult<()> {
        if self.resolved.swap(true, Ordering::SeqCst) {
            debug_assert!(false, "completion signal resolved twice");
            return Err(DomainError::SignalAlreadyResolved);
        }
        self.tx.send_replace(Some(value));
        Ok(())
    }

    /// Whether the outcome has been published.
    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::SeqCst)
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Awaiter side of a [`CompletionSignal`].
#[derive(Debug, Clone)]
pub struct CompletionHandle {
    rx: watch::Receiver<Option<bool>>,
}

impl CompletionHandle {
    /// A handle that is already resolved, for callers rejected before a
    /// negotiation attempt can start.
    pub fn resolved(value: bool) -> Self {
        let (tx, rx) = watch::channel(Some(value));
        drop(tx);
        Self { rx }
    }

    /// Suspend until the outcome is published, then return it.
    ///
    /// Idempotent: once resolved, every call returns the same value
    /// immediately. If the resolving side is dropped without publishing an
    /// outcome, the caller stays suspended; an outcome can only arrive
    /// through a fresh negotiation attempt.
    pub async fn wait(&mut self) -> bool {
        loop {
            if let Some(value) = *self.rx.borrow_and_update() {
                return value;
            }
            if self.rx.changed().await.is_err() {
                warn!("completion signal dropped unresolved; caller remains suspended");
                std::future::pending::<()>().await;
            }
        }
    }

    /// The outcome if already published, without suspending.
    pub fn try_value(&self) -> Option<bool> {
        *self.rx.borrow()
    }
}
