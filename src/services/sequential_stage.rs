//! Sequential stage: request an ordered capability list one at a time.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    ApplicabilityRules, Capability, CapabilityOutcome, PendingQueue, StageResult,
};
use crate::domain::ports::{GrantPrompter, PlatformGrants, RationaleChoice, SettingsChoice};
use crate::services::completion_signal::CompletionSignal;
use crate::services::rationale_catalog::RationaleCatalog;

/// How a sequential stage invocation ended.
enum StageExit {
    /// A verdict was reached.
    Resolved(StageResult),
    /// The user left for the settings page; no verdict can be reached in
    /// this attempt.
    AwaitingSettings,
}

/// Final disposition of one denied capability.
enum Settled {
    Granted,
    Refused,
    Cancelled,
    RedirectedToSettings,
}

/// Second negotiation stage.
///
/// Requests a fixed, explicitly ordered list of capabilities one at a time.
/// A later capability is never requested before the one before it has a
/// final outcome. Entries that are inapplicable on the current platform
/// version or already granted are skipped without a request.
///
/// Each denial gets a rationale-backed retry while the platform still
/// allows it; a permanent denial escalates to a settings
/// redirect. If the user opens settings the stage leaves its signal
/// unresolved, deferring re-verification to a fresh negotiation attempt.
pub struct SequentialStage {
    platform: Arc<dyn PlatformGrants>,
    prompter: Arc<dyn GrantPrompter>,
    catalog: Arc<RationaleCatalog>,
    order: Vec<Capability>,
    rules: ApplicabilityRules,
}

impl SequentialStage {
    /// Create a sequential stage over the given collaborators and list.
    pub fn new(
        platform: Arc<dyn PlatformGrants>,
        prompter: Arc<dyn GrantPrompter>,
        catalog: Arc<RationaleCatalog>,
        order: Vec<Capability>,
        rules: ApplicabilityRules,
    ) -> Self {
        Self {
            platform,
            prompter,
            catalog,
            order,
            rules,
        }
    }

    /// Run the stage, resolving `signal` at most once.
    ///
    /// The signal stays unresolved only on the settings-redirect path; every
    /// other path, including internal errors, publishes a verdict. The
    /// returned result carries the per-capability outcomes for the
    /// orchestrator.
    #[instrument(name = "sequential_stage", skip_all)]
    pub async fn run(&self, signal: &CompletionSignal) -> StageResult {
        let result = match self.execute().await {
            Ok(StageExit::Resolved(result)) => result,
            Ok(StageExit::AwaitingSettings) => {
                info!("user redirected to settings; verdict deferred to the next attempt");
                std::future::pending().await
            }
            Err(err) => {
                error!(error = %err, "sequential stage aborted");
                StageResult::failure(HashMap::new())
            }
        };
        info!(succeeded = result.succeeded, "sequential stage finished");
        if let Err(err) = signal.resolve(result.succeeded) {
            error!(error = %err, "sequential stage verdict could not be published");
        }
        result
    }

    async fn execute(&self) -> DomainResult<StageExit> {
        let version = self.platform.platform_version();
        let mut outcomes = HashMap::new();
        let mut queue = PendingQueue::new();
        for capability in &self.order {
            if !self.rules.is_applicable(capability, version) {
                debug!(%capability, "skipped without a request");
                outcomes.insert(capability.clone(), CapabilityOutcome::NotApplicable);
                continue;
            }
            queue.push_unique(capability.clone());
        }

        while let Some(capability) = queue.peek().cloned() {
            // Grant state is re-queried on every attempt; an entry granted
            // earlier (or while the user visited settings) is not re-asked.
            if self.platform.is_granted(&capability) {
                debug!(%capability, "already granted");
                outcomes.insert(capability.clone(), CapabilityOutcome::Granted);
                queue.pop()?;
                continue;
            }

            if self.request(&capability).await {
                debug!(%capability, "granted");
                outcomes.insert(capability.clone(), CapabilityOutcome::Granted);
                queue.pop()?;
                continue;
            }

            // The request already consumed this attempt; the capability's
            // final disposition is now decided through dialogs alone.
            queue.pop()?;
            outcomes.insert(capability.clone(), CapabilityOutcome::DeniedRetryable);
            match self.settle_denied(&capability).await {
                Settled::Granted => {
                    outcomes.insert(capability.clone(), CapabilityOutcome::Granted);
                }
                Settled::Refused => {
                    outcomes.insert(capability, CapabilityOutcome::Abandoned);
                    return Ok(StageExit::Resolved(StageResult::failure(outcomes)));
                }
                Settled::Cancelled => {
                    outcomes.insert(capability, CapabilityOutcome::DeniedPermanent);
                    return Ok(StageExit::Resolved(StageResult::failure(outcomes)));
                }
                Settled::RedirectedToSettings => return Ok(StageExit::AwaitingSettings),
            }
        }

        Ok(StageExit::Resolved(StageResult::success(outcomes)))
    }

    /// Re-prompt or escalate for a denied capability until it is granted or
    /// the user abandons the stage.
    async fn settle_denied(&self, capability: &Capability) -> Settled {
        loop {
            if self.platform.can_show_rationale(capability) {
                let text = self.catalog.describe(capability, false);
                match self.prompter.present_rationale(&text).await {
                    RationaleChoice::Agree => {
                        if self.request(capability).await {
                            info!(%capability, "granted after rationale");
                            return Settled::Granted;
                        }
                    }
                    RationaleChoice::Refuse => {
                        info!(%capability, "user cancelled during rationale");
                        return Settled::Refused;
                    }
                }
            } else {
                info!(%capability, "permanently declined; offering settings redirect");
                let text = self.catalog.describe(capability, true);
                match self.prompter.present_settings_redirect(&text).await {
                    SettingsChoice::OpenSettings => {
                        self.platform.open_settings();
                        return Settled::RedirectedToSettings;
                    }
                    SettingsChoice::Cancel => return Settled::Cancelled,
                }
            }
        }
    }

    async fn request(&self, capability: &Capability) -> bool {
        match self.platform.request_single(capability).await {
            Ok(granted) => granted,
            Err(err) => {
                warn!(%capability, error = %err, "request failed; treating as denied");
                false
            }
        }
    }
}
