//! Domain models for capability-grant negotiation.

mod capability;
mod config;
mod queue;
mod rules;
mod stage;

pub use capability::{Capability, CapabilityOutcome, PlatformVersion};
pub use config::{Config, LogFormat, LoggingConfig, NegotiationConfig};
pub use queue::PendingQueue;
pub use rules::{ApplicabilityRule, ApplicabilityRules};
pub use stage::{NegotiationPhase, StageResult};
