//! Orchestrates the batch stage, then the sequential stage.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, error, info_span, Instrument};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::models::{NegotiationConfig, NegotiationPhase, StageResult};
use crate::domain::ports::{GrantPrompter, PlatformGrants};
use crate::services::batch_stage::BatchStage;
use crate::services::completion_signal::{CompletionHandle, CompletionSignal};
use crate::services::rationale_catalog::RationaleCatalog;
use crate::services::sequential_stage::SequentialStage;

/// Single-use driver for one negotiation attempt.
///
/// Runs the batch stage and, only if it succeeds, the sequential stage,
/// combining both outcomes into one overall completion signal:
///
/// ```text
/// Idle → RunningBatch → RunningSequential → Done
///                     ↘ Failed ───────────↗
/// ```
///
/// Each attempt owns its queues and signals; grant state is re-queried from
/// the platform on every fresh instance, so retrying after a denial is
/// simply a new orchestrator and a new [`negotiate`] call.
///
/// [`negotiate`]: StageOrchestrator::negotiate
pub struct StageOrchestrator {
    batch: Arc<BatchStage>,
    sequential: Arc<SequentialStage>,
    phase: Arc<RwLock<NegotiationPhase>>,
    started: AtomicBool,
}

impl StageOrchestrator {
    /// Build an orchestrator with the built-in rationale catalog.
    pub fn new(
        platform: Arc<dyn PlatformGrants>,
        prompter: Arc<dyn GrantPrompter>,
        config: NegotiationConfig,
    ) -> Self {
        Self::with_catalog(platform, prompter, Arc::new(RationaleCatalog::new()), config)
    }

    /// Build an orchestrator with a host-supplied rationale catalog.
    pub fn with_catalog(
        platform: Arc<dyn PlatformGrants>,
        prompter: Arc<dyn GrantPrompter>,
        catalog: Arc<RationaleCatalog>,
        config: NegotiationConfig,
    ) -> Self {
        let batch = Arc::new(BatchStage::new(
            Arc::clone(&platform),
            Arc::clone(&prompter),
            Arc::clone(&catalog),
            config.rules.clone(),
        ));
        let sequential = Arc::new(SequentialStage::new(
            platform,
            prompter,
            catalog,
            config.sequential_order,
            config.rules,
        ));
        Self {
            batch,
            sequential,
            phase: Arc::new(RwLock::new(NegotiationPhase::Idle)),
            started: AtomicBool::new(false),
        }
    }

    /// Start the negotiation attempt and return the overall outcome handle.
    ///
    /// The attempt runs as a single spawned task; the handle resolves `true`
    /// only when both stages succeed. Calling this twice on one instance is
    /// a protocol violation: the repeat call gets a handle already resolved
    /// `false` and the running attempt is untouched.
    pub fn negotiate(&self) -> CompletionHandle {
        if self.started.swap(true, Ordering::SeqCst) {
            debug_assert!(false, "orchestrator instance is single-use");
            error!(
                error = %DomainError::AlreadyStarted,
                "negotiate() called twice on a single-use orchestrator"
            );
            return CompletionHandle::resolved(false);
        }

        let overall = CompletionSignal::new();
        let handle = overall.handle();
        let attempt_id = Uuid::new_v4();
        let span = info_span!("negotiation", %attempt_id);
        let batch = Arc::clone(&self.batch);
        let sequential = Arc::clone(&self.sequential);
        let phase = Arc::clone(&self.phase);
        tokio::spawn(run_attempt(batch, sequential, phase, overall).instrument(span));
        handle
    }

    /// Current phase of the attempt.
    pub async fn phase(&self) -> NegotiationPhase {
        *self.phase.read().await
    }
}

async fn run_attempt(
    batch: Arc<BatchStage>,
    sequential: Arc<SequentialStage>,
    phase: Arc<RwLock<NegotiationPhase>>,
    overall: CompletionSignal,
) {
    transition(&phase, NegotiationPhase::RunningBatch).await;
    let batch_signal = CompletionSignal::new();
    let batch_result = batch.run(&batch_signal).await;
    log_outcomes("batch", &batch_result);

    if !batch_result.succeeded {
        transition(&phase, NegotiationPhase::Failed).await;
        resolve(&overall, false);
        transition(&phase, NegotiationPhase::Done).await;
        return;
    }

    transition(&phase, NegotiationPhase::RunningSequential).await;
    let sequential_signal = CompletionSignal::new();
    // May stay suspended forever if the user leaves for settings; the
    // overall signal then stays pending as well.
    let sequential_result = sequential.run(&sequential_signal).await;
    log_outcomes("sequential", &sequential_result);

    resolve(&overall, sequential_result.succeeded);
    transition(&phase, NegotiationPhase::Done).await;
}

fn log_outcomes(stage: &str, result: &StageResult) {
    for (capability, outcome) in &result.outcomes {
        debug!(%capability, ?outcome, stage, "capability outcome");
    }
}

async fn transition(phase: &RwLock<NegotiationPhase>, next: NegotiationPhase) {
    let mut current = phase.write().await;
    if current.can_transition_to(next) {
        debug!(from = %*current, to = %next, "phase transition");
        *current = next;
    } else {
        let err = DomainError::InvalidPhaseTransition {
            from: current.to_string(),
            to: next.to_string(),
        };
        debug_assert!(false, "{err}");
        error!(error = %err, "phase transition ignored");
    }
}

fn resolve(overall: &CompletionSignal, value: bool) {
    if let Err(err) = overall.resolve(value) {
        error!(error = %err, "overall verdict could not be published");
    }
}
