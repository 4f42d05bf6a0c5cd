//! Concrete collaborator implementations.

mod simulated;

pub use simulated::{ScriptedPrompter, SimulatedPlatform};
