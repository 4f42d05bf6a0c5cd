//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the boundary collaborator contracts the engine calls:
//! - `PlatformGrants`: OS-side grant queries and requests
//! - `GrantPrompter`: UI-side rationale and settings-redirect dialogs
//!
//! These traits keep the negotiation engine independent of any concrete
//! platform or UI toolkit.

mod errors;
mod grant_prompter;
mod platform_grants;

pub use errors::PlatformError;
pub use grant_prompter::{GrantPrompter, RationaleChoice, SettingsChoice};
pub use platform_grants::PlatformGrants;
