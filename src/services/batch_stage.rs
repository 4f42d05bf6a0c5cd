//! Batch stage: request the declared capability set at once, then walk the
//! denied subset.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    ApplicabilityRules, Capability, CapabilityOutcome, PendingQueue, StageResult,
};
use crate::domain::ports::{GrantPrompter, PlatformGrants, RationaleChoice, SettingsChoice};
use crate::services::completion_signal::CompletionSignal;
use crate::services::rationale_catalog::RationaleCatalog;

/// First negotiation stage.
///
/// Requests every not-yet-granted declared capability as a single batch,
/// then drains the denied subset one capability at a time, each with an
/// independent rationale or settings decision. A single refusal abandons the
/// whole stage (fail-fast); a permanently declined capability fails the
/// stage whether or not the user opens settings, deferring re-verification
/// to the next attempt.
pub struct BatchStage {
    platform: Arc<dyn PlatformGrants>,
    prompter: Arc<dyn GrantPrompter>,
    catalog: Arc<RationaleCatalog>,
    rules: ApplicabilityRules,
}

impl BatchStage {
    /// Create a batch stage over the given collaborators.
    pub fn new(
        platform: Arc<dyn PlatformGrants>,
        prompter: Arc<dyn GrantPrompter>,
        catalog: Arc<RationaleCatalog>,
        rules: ApplicabilityRules,
    ) -> Self {
        Self {
            platform,
            prompter,
            catalog,
            rules,
        }
    }

    /// Run the stage to completion, resolving `signal` exactly once.
    ///
    /// Errors never escape the stage: configuration and protocol failures
    /// are logged and resolve the signal `false`. The returned result
    /// carries the per-capability outcomes for the orchestrator.
    #[instrument(name = "batch_stage", skip_all)]
    pub async fn run(&self, signal: &CompletionSignal) -> StageResult {
        let result = match self.execute().await {
            Ok(result) => result,
            Err(err) => {
                error!(error = %err, "batch stage aborted");
                StageResult::failure(HashMap::new())
            }
        };
        info!(succeeded = result.succeeded, "batch stage finished");
        if let Err(err) = signal.resolve(result.succeeded) {
            error!(error = %err, "batch stage verdict could not be published");
        }
        result
    }

    async fn execute(&self) -> DomainResult<StageResult> {
        let declared = self.platform.declared_capabilities()?;
        if declared.is_empty() {
            return Err(DomainError::EmptyManifest);
        }

        let version = self.platform.platform_version();
        let mut outcomes = HashMap::new();
        let mut to_request = Vec::new();
        for capability in declared {
            if self.platform.is_granted(&capability) {
                debug!(%capability, "already granted");
                outcomes.insert(capability, CapabilityOutcome::Granted);
                continue;
            }
            if !self.rules.is_applicable(&capability, version) {
                outcomes.insert(capability, CapabilityOutcome::NotApplicable);
                continue;
            }
            if !to_request.contains(&capability) {
                outcomes.insert(capability.clone(), CapabilityOutcome::Pending);
                to_request.push(capability);
            }
        }

        if to_request.is_empty() {
            info!("every declared capability already granted; no prompt issued");
            return Ok(StageResult::success(outcomes));
        }

        debug!(count = to_request.len(), "issuing batch request");
        let grants = match self.platform.request_batch(&to_request).await {
            Ok(grants) => grants,
            Err(err) => {
                warn!(error = %err, "batch request failed; treating all as denied");
                to_request.iter().cloned().map(|c| (c, false)).collect()
            }
        };

        // Denied capabilities enter the queue in encounter order, once each.
        let mut queue = PendingQueue::new();
        for capability in &to_request {
            if grants.get(capability).copied().unwrap_or(false) {
                outcomes.insert(capability.clone(), CapabilityOutcome::Granted);
            } else {
                debug!(%capability, "denied in batch; queued");
                outcomes.insert(capability.clone(), CapabilityOutcome::DeniedRetryable);
                queue.push_unique(capability.clone());
            }
        }

        let succeeded = self.drain(queue, &mut outcomes).await?;
        Ok(if succeeded {
            StageResult::success(outcomes)
        } else {
            StageResult::failure(outcomes)
        })
    }

    /// Walk the denied subset until every capability is granted or the user
    /// abandons the stage.
    async fn drain(
        &self,
        mut queue: PendingQueue,
        outcomes: &mut HashMap<Capability, CapabilityOutcome>,
    ) -> DomainResult<bool> {
        while let Some(capability) = queue.peek().cloned() {
            if self.platform.can_show_rationale(&capability) {
                let text = self.catalog.describe(&capability, false);
                match self.prompter.present_rationale(&text).await {
                    RationaleChoice::Agree => {
                        let granted = match self.platform.request_single(&capability).await {
                            Ok(granted) => granted,
                            Err(err) => {
                                warn!(%capability, error = %err, "re-request failed; treating as denied");
                                false
                            }
                        };
                        if granted {
                            info!(%capability, "granted after rationale");
                            outcomes.insert(capability.clone(), CapabilityOutcome::Granted);
                            queue.pop()?;
                        }
                        // Denied again: the next iteration re-checks whether
                        // rationale is still available for this capability.
                    }
                    RationaleChoice::Refuse => {
                        info!(%capability, remaining = queue.len(), "user refused; abandoning batch stage");
                        outcomes.insert(capability, CapabilityOutcome::Abandoned);
                        return Ok(false);
                    }
                }
            } else {
                // Permanently declined. Re-verification after a settings
                // visit happens on the next attempt, so both choices fail
                // this stage.
                info!(%capability, "permanently declined; offering settings redirect");
                outcomes.insert(capability.clone(), CapabilityOutcome::DeniedPermanent);
                let text = self.catalog.describe(&capability, true);
                match self.prompter.present_settings_redirect(&text).await {
                    SettingsChoice::OpenSettings => self.platform.open_settings(),
                    SettingsChoice::Cancel => {}
                }
                return Ok(false);
            }
        }
        Ok(true)
    }
}
