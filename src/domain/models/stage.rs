//! Stage results and the orchestrator phase machine.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::capability::{Capability, CapabilityOutcome};

/// Outcome of a single stage, produced by the stage and consumed by the
/// orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    /// Whether every capability the stage processed resolved favorably.
    pub succeeded: bool,
    /// The outcome recorded per processed capability. Entries the stage
    /// never reached (e.g. queued behind a refusal) are absent.
    pub outcomes: HashMap<Capability, CapabilityOutcome>,
}

impl StageResult {
    /// A successful stage outcome. Every recorded outcome must be favorable.
    pub fn success(outcomes: HashMap<Capability, CapabilityOutcome>) -> Self {
        debug_assert!(outcomes.values().all(|outcome| outcome.is_favorable()));
        Self {
            succeeded: true,
            outcomes,
        }
    }

    /// A failed stage outcome, keeping whatever was recorded up to the
    /// failure point.
    pub fn failure(outcomes: HashMap<Capability, CapabilityOutcome>) -> Self {
        Self {
            succeeded: false,
            outcomes,
        }
    }

    /// The outcome recorded for a capability, if the stage processed it.
    pub fn outcome(&self, capability: &Capability) -> Option<CapabilityOutcome> {
        self.outcomes.get(capability).copied()
    }
}

/// Phase of a negotiation attempt.
///
/// ```text
/// Idle → RunningBatch → RunningSequential → Done
///                     ↘ Failed ───────────↗
/// ```
///
/// No transition re-enters `RunningBatch` or `RunningSequential`; an
/// orchestrator instance is single-use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationPhase {
    /// Created, not yet started.
    Idle,
    /// Batch stage in progress.
    RunningBatch,
    /// Batch stage succeeded; sequential stage in progress.
    RunningSequential,
    /// Batch stage failed; sequential stage will never start.
    Failed,
    /// Overall signal resolved.
    Done,
}

impl NegotiationPhase {
    /// Whether `next` is a legal successor of this phase.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::RunningBatch)
                | (Self::RunningBatch, Self::RunningSequential | Self::Failed)
                | (Self::RunningSequential | Self::Failed, Self::Done)
        )
    }

    /// Whether the attempt has finished.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for NegotiationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::RunningBatch => "running_batch",
            Self::RunningSequential => "running_sequential",
            Self::Failed => "failed",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}
