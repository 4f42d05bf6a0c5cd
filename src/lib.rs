//! Grantflow - Capability-Grant Negotiation Engine
//!
//! Grantflow drives a two-stage, asynchronous negotiation for OS-mediated
//! permissions: a batch stage over the app's declared capability manifest
//! followed by a sequential stage for order-sensitive capabilities, with
//! rationale-backed retries, permanent-denial detection, and a
//! settings-redirect fallback. Each capability is resolved exactly once and
//! the caller receives a single yes/no completion signal per stage and
//! overall.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): capability models, queues, phase machine,
//!   and the collaborator ports
//! - **Service Layer** (`services`): completion signals, rationale catalog,
//!   the two stages, and the orchestrator
//! - **Adapters** (`adapters`): scripted in-memory collaborators for demos
//!   and tests
//! - **Infrastructure Layer** (`infrastructure`): configuration loading and
//!   logging setup
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use grantflow::adapters::{ScriptedPrompter, SimulatedPlatform};
//! use grantflow::domain::models::{Capability, NegotiationConfig};
//! use grantflow::services::StageOrchestrator;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let platform = SimulatedPlatform::new(34)
//!     .with_manifest(vec![Capability::camera()])
//!     .with_granted(Capability::camera())
//!     .with_granted(Capability::fine_location())
//!     .with_granted(Capability::coarse_location())
//!     .with_granted(Capability::post_notifications())
//!     .with_granted(Capability::foreground_service());
//!
//! let orchestrator = StageOrchestrator::new(
//!     Arc::new(platform),
//!     Arc::new(ScriptedPrompter::agreeing()),
//!     NegotiationConfig::default(),
//! );
//!
//! let mut outcome = orchestrator.negotiate();
//! assert!(outcome.wait().await);
//! # }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    ApplicabilityRule, ApplicabilityRules, Capability, CapabilityOutcome, Config, LogFormat,
    LoggingConfig, NegotiationConfig, NegotiationPhase, PendingQueue, PlatformVersion, StageResult,
};
pub use domain::ports::{
    GrantPrompter, PlatformError, PlatformGrants, RationaleChoice, SettingsChoice,
};
pub use services::{
    BatchStage, CompletionHandle, CompletionSignal, RationaleCatalog, RationaleText,
    SequentialStage, StageOrchestrator,
};
