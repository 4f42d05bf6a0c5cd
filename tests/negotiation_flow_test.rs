//! End-to-end negotiation flows against the scripted adapters.

use std::sync::Arc;
use std::time::Duration;

use grantflow::adapters::{ScriptedPrompter, SimulatedPlatform};
use grantflow::domain::models::{Capability, NegotiationConfig};
use grantflow::domain::ports::{RationaleChoice, SettingsChoice};
use grantflow::services::StageOrchestrator;

fn location_config() -> NegotiationConfig {
    NegotiationConfig {
        sequential_order: vec![Capability::coarse_location(), Capability::fine_location()],
        ..NegotiationConfig::default()
    }
}

fn orchestrator(
    platform: &Arc<SimulatedPlatform>,
    prompter: &Arc<ScriptedPrompter>,
    config: NegotiationConfig,
) -> StageOrchestrator {
    StageOrchestrator::new(
        Arc::clone(platform) as _,
        Arc::clone(prompter) as _,
        config,
    )
}

/// Camera is denied in the batch, granted after the rationale; both location
/// capabilities grant on first ask. Overall outcome is `true`.
#[tokio::test]
async fn camera_rationale_then_location_grants() {
    let platform = Arc::new(
        SimulatedPlatform::new(34)
            .with_manifest(vec![Capability::camera()])
            .with_response(Capability::camera(), false)
            .with_response(Capability::camera(), true)
            .with_response(Capability::coarse_location(), true)
            .with_response(Capability::fine_location(), true),
    );
    let prompter = Arc::new(ScriptedPrompter::agreeing().then_rationale(RationaleChoice::Agree));

    let orchestrator = orchestrator(&platform, &prompter, location_config());
    assert!(orchestrator.negotiate().wait().await);

    // One batch prompt, then one camera re-request, then the ordered list.
    assert_eq!(platform.batch_requests(), vec![vec![Capability::camera()]]);
    assert_eq!(
        platform.single_requests(),
        vec![
            Capability::camera(),
            Capability::coarse_location(),
            Capability::fine_location(),
        ]
    );
    assert_eq!(prompter.rationales_shown().len(), 1);
    assert!(prompter.rationales_shown()[0].contains("camera"));
}

/// Audio is denied and the user refuses the rationale: overall outcome is
/// `false` and the location list is never requested.
#[tokio::test]
async fn audio_refusal_skips_the_location_stage() {
    let platform = Arc::new(
        SimulatedPlatform::new(34)
            .with_manifest(vec![Capability::record_audio()])
            .with_response(Capability::record_audio(), false),
    );
    let prompter = Arc::new(ScriptedPrompter::refusing());

    let orchestrator = orchestrator(&platform, &prompter, location_config());
    assert!(!orchestrator.negotiate().wait().await);

    assert_eq!(platform.single_requests(), Vec::<Capability>::new());
    assert!(prompter.settings_prompts_shown().is_empty());
}

/// A sequential entry below its platform-version threshold is skipped
/// without any request; remaining entries proceed normally.
#[tokio::test]
async fn notifications_skipped_below_threshold() {
    let platform = Arc::new(
        SimulatedPlatform::new(32)
            .with_manifest(vec![Capability::camera()])
            .with_granted(Capability::camera())
            .with_response(Capability::coarse_location(), true)
            .with_response(Capability::fine_location(), true),
    );
    let prompter = Arc::new(ScriptedPrompter::agreeing());

    let config = NegotiationConfig {
        sequential_order: vec![
            Capability::coarse_location(),
            Capability::post_notifications(),
            Capability::fine_location(),
        ],
        ..NegotiationConfig::default()
    };
    let orchestrator = orchestrator(&platform, &prompter, config);
    assert!(orchestrator.negotiate().wait().await);

    assert_eq!(
        platform.single_requests(),
        vec![Capability::coarse_location(), Capability::fine_location()]
    );
}

/// Permanently declined capability in the batch: the settings redirect is
/// offered, opening settings still fails this attempt, and the settings
/// page is reached.
#[tokio::test]
async fn permanent_denial_redirects_to_settings() {
    let platform = Arc::new(
        SimulatedPlatform::new(34)
            .with_manifest(vec![Capability::camera()])
            .with_response(Capability::camera(), false)
            .with_permanently_declined(Capability::camera()),
    );
    let prompter =
        Arc::new(ScriptedPrompter::agreeing().then_settings(SettingsChoice::OpenSettings));

    let orchestrator = orchestrator(&platform, &prompter, location_config());
    assert!(!orchestrator.negotiate().wait().await);

    assert_eq!(platform.settings_opened(), 1);
    assert_eq!(prompter.rationales_shown().len(), 0);

    // The redirect dialog explains the permanently declined grant.
    let prompts = prompter.settings_prompts_shown();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("repeatedly declined camera"));
    assert!(prompts[0].contains("app settings"));
}

/// Opening settings during the sequential stage leaves the overall outcome
/// pending; re-verification belongs to a fresh attempt.
#[tokio::test]
async fn settings_redirect_in_sequential_stage_defers_the_verdict() {
    let platform = Arc::new(
        SimulatedPlatform::new(34)
            .with_manifest(vec![Capability::camera()])
            .with_granted(Capability::camera())
            .with_response(Capability::coarse_location(), false)
            .with_permanently_declined(Capability::coarse_location()),
    );
    let prompter =
        Arc::new(ScriptedPrompter::agreeing().then_settings(SettingsChoice::OpenSettings));

    let orch = orchestrator(&platform, &prompter, location_config());
    let mut handle = orch.negotiate();

    let outcome = tokio::time::timeout(Duration::from_millis(50), handle.wait()).await;
    assert!(outcome.is_err(), "verdict must stay pending");
    assert_eq!(platform.settings_opened(), 1);
    assert!(prompter.settings_prompts_shown()[0].contains("coarse location"));

    // A fresh attempt with the grant now in place succeeds.
    let retry_platform = Arc::new(
        SimulatedPlatform::new(34)
            .with_manifest(vec![Capability::camera()])
            .with_granted(Capability::camera())
            .with_granted(Capability::coarse_location())
            .with_granted(Capability::fine_location()),
    );
    let retry = orchestrator(&retry_platform, &prompter, location_config());
    assert!(retry.negotiate().wait().await);
}

/// The same outcome can be read by several independent callers.
#[tokio::test]
async fn outcome_is_shared_across_readers() {
    let platform = Arc::new(
        SimulatedPlatform::new(34)
            .with_manifest(vec![Capability::camera()])
            .with_granted(Capability::camera())
            .with_granted(Capability::coarse_location())
            .with_granted(Capability::fine_location()),
    );
    let prompter = Arc::new(ScriptedPrompter::agreeing());

    let orchestrator = orchestrator(&platform, &prompter, location_config());
    let handle = orchestrator.negotiate();

    let mut first = handle.clone();
    let mut second = handle;
    let (a, b) = tokio::join!(first.wait(), second.wait());
    assert!(a);
    assert!(b);
}
