//! Negotiation engine services.

mod batch_stage;
mod completion_signal;
mod orchestrator;
mod rationale_catalog;
mod sequential_stage;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch_stage::BatchStage;
pub use completion_signal::{CompletionHandle, CompletionSignal};
pub use orchestrator::StageOrchestrator;
pub use rationale_catalog::{RationaleCatalog, RationaleText};
pub use sequential_stage::SequentialStage;
