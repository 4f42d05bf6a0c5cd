//! Shared mockall definitions for service tests.

use std::collections::HashMap;

use async_trait::async_trait;
use mockall::mock;

use crate::domain::models::{Capability, PlatformVersion};
use crate::domain::ports::{
    GrantPrompter, PlatformError, PlatformGrants, RationaleChoice, SettingsChoice,
};

mock! {
    pub Platform {}

    #[async_trait]
    impl PlatformGrants for Platform {
        fn declared_capabilities(&self) -> Result<Vec<Capability>, PlatformError>;
        fn is_granted(&self, capability: &Capability) -> bool;
        fn can_show_rationale(&self, capability: &Capability) -> bool;
        fn platform_version(&self) -> PlatformVersion;
        async fn request_batch(
            &self,
            capabilities: &[Capability],
        ) -> Result<HashMap<Capability, bool>, PlatformError>;
        async fn request_single(&self, capability: &Capability) -> Result<bool, PlatformError>;
        fn open_settings(&self);
    }
}

mock! {
    pub Prompter {}

    #[async_trait]
    impl GrantPrompter for Prompter {
        async fn present_rationale(&self, text: &str) -> RationaleChoice;
        async fn present_settings_redirect(&self, text: &str) -> SettingsChoice;
    }
}
