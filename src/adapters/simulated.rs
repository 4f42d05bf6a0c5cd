//! Scripted in-memory collaborators for demos and tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::models::{Capability, PlatformVersion};
use crate::domain::ports::{
    GrantPrompter, PlatformError, PlatformGrants, RationaleChoice, SettingsChoice,
};

/// In-memory [`PlatformGrants`] implementation with scripted answers.
///
/// Grant requests consume scripted responses per capability; once a script
/// is exhausted (or absent) a capability is granted if it is in the granted
/// set and denied otherwise. A granted response updates the granted set, so
/// re-queries observe the new state. All issued requests are recorded for
/// assertions.
pub struct SimulatedPlatform {
    version: PlatformVersion,
    state: Mutex<PlatformState>,
}

#[derive(Default)]
struct PlatformState {
    manifest: Vec<Capability>,
    granted: HashSet<Capability>,
    permanently_declined: HashSet<Capability>,
    responses: HashMap<Capability, VecDeque<bool>>,
    batch_requests: Vec<Vec<Capability>>,
    single_requests: Vec<Capability>,
    settings_opened: usize,
}

impl SimulatedPlatform {
    /// A platform at the given API level with an empty manifest.
    pub fn new(version: u32) -> Self {
        Self {
            version: PlatformVersion(version),
            state: Mutex::new(PlatformState::default()),
        }
    }

    /// Set the declared capability manifest.
    #[must_use]
    pub fn with_manifest(self, manifest: Vec<Capability>) -> Self {
        self.lock().manifest = manifest;
        self
    }

    /// Mark a capability as currently granted.
    #[must_use]
    pub fn with_granted(self, capability: Capability) -> Self {
        self.lock().granted.insert(capability);
        self
    }

    /// Mark a capability as permanently declined (no rationale available).
    #[must_use]
    pub fn with_permanently_declined(self, capability: Capability) -> Self {
        self.lock().permanently_declined.insert(capability);
        self
    }

    /// Script the next grant-request answer for a capability. Answers are
    /// consumed in the order they were scripted.
    #[must_use]
    pub fn with_response(self, capability: Capability, granted: bool) -> Self {
        self.lock()
            .responses
            .entry(capability)
            .or_default()
            .push_back(granted);
        self
    }

    /// Batches issued so far, in order.
    pub fn batch_requests(&self) -> Vec<Vec<Capability>> {
        self.lock().batch_requests.clone()
    }

    /// Single requests issued so far, in order.
    pub fn single_requests(&self) -> Vec<Capability> {
        self.lock().single_requests.clone()
    }

    /// How often the settings page was opened.
    pub fn settings_opened(&self) -> usize {
        self.lock().settings_opened
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PlatformState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn answer(state: &mut PlatformState, capability: &Capability) -> bool {
        let granted = state
            .responses
            .get_mut(capability)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| state.granted.contains(capability));
        if granted {
            state.granted.insert(capability.clone());
        }
        granted
    }
}

#[async_trait]
impl PlatformGrants for SimulatedPlatform {
    fn declared_capabilities(&self) -> Result<Vec<Capability>, PlatformError> {
        Ok(self.lock().manifest.clone())
    }

    fn is_granted(&self, capability: &Capability) -> bool {
        self.lock().granted.contains(capability)
    }

    fn can_show_rationale(&self, capability: &Capability) -> bool {
        !self.lock().permanently_declined.contains(capability)
    }

    fn platform_version(&self) -> PlatformVersion {
        self.version
    }

    async fn request_batch(
        &self,
        capabilities: &[Capability],
    ) -> Result<HashMap<Capability, bool>, PlatformError> {
        let mut state = self.lock();
        state.batch_requests.push(capabilities.to_vec());
        Ok(capabilities
            .iter()
            .map(|capability| {
                let granted = Self::answer(&mut state, capability);
                debug!(%capability, granted, "simulated batch answer");
                (capability.clone(), granted)
            })
            .collect())
    }

    async fn request_single(&self, capability: &Capability) -> Result<bool, PlatformError> {
        let mut state = self.lock();
        state.single_requests.push(capability.clone());
        let granted = Self::answer(&mut state, capability);
        debug!(%capability, granted, "simulated single answer");
        Ok(granted)
    }

    fn open_settings(&self) {
        self.lock().settings_opened += 1;
    }
}

/// Scripted [`GrantPrompter`] with configurable fallback choices.
///
/// Scripted choices are consumed first; once exhausted the defaults apply
/// (agree to rationales, cancel settings redirects, unless changed).
pub struct ScriptedPrompter {
    default_rationale: RationaleChoice,
    default_settings: SettingsChoice,
    state: Mutex<PrompterState>,
}

#[derive(Default)]
struct PrompterState {
    rationale_script: VecDeque<RationaleChoice>,
    settings_script: VecDeque<SettingsChoice>,
    rationales_shown: Vec<String>,
    settings_prompts: Vec<String>,
}

impl ScriptedPrompter {
    /// A prompter that agrees to rationales and cancels settings redirects.
    pub fn agreeing() -> Self {
        Self {
            default_rationale: RationaleChoice::Agree,
            default_settings: SettingsChoice::Cancel,
            state: Mutex::new(PrompterState::default()),
        }
    }

    /// A prompter that refuses rationales and cancels settings redirects.
    pub fn refusing() -> Self {
        Self {
            default_rationale: RationaleChoice::Refuse,
            default_settings: SettingsChoice::Cancel,
            state: Mutex::new(PrompterState::default()),
        }
    }

    /// Script the next rationale answer.
    #[must_use]
    pub fn then_rationale(self, choice: RationaleChoice) -> Self {
        self.lock().rationale_script.push_back(choice);
        self
    }

    /// Script the next settings-redirect answer.
    #[must_use]
    pub fn then_settings(self, choice: SettingsChoice) -> Self {
        self.lock().settings_script.push_back(choice);
        self
    }

    /// Every rationale text shown so far, in order.
    pub fn rationales_shown(&self) -> Vec<String> {
        self.lock().rationales_shown.clone()
    }

    /// Every settings-redirect text shown so far, in order.
    pub fn settings_prompts_shown(&self) -> Vec<String> {
        self.lock().settings_prompts.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PrompterState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl GrantPrompter for ScriptedPrompter {
    async fn present_rationale(&self, text: &str) -> RationaleChoice {
        let mut state = self.lock();
        state.rationales_shown.push(text.to_string());
        state
            .rationale_script
            .pop_front()
            .unwrap_or(self.default_rationale)
    }

    async fn present_settings_redirect(&self, text: &str) -> SettingsChoice {
        let mut state = self.lock();
        state.settings_prompts.push(text.to_string());
        state
            .settings_script
            .pop_front()
            .unwrap_or(self.default_settings)
    }
}
