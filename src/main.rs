//! Grantflow demo CLI.
//!
//! Runs the negotiation engine against scripted in-memory collaborators so
//! the stage flow can be observed end to end without a real platform.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use tracing::info;

use grantflow::adapters::{ScriptedPrompter, SimulatedPlatform};
use grantflow::domain::models::Capability;
use grantflow::domain::ports::{RationaleChoice, SettingsChoice};
use grantflow::infrastructure::config::ConfigLoader;
use grantflow::infrastructure::logging;
use grantflow::services::StageOrchestrator;

#[derive(Parser)]
#[command(name = "grantflow", version, about = "Capability-grant negotiation demo")]
struct Cli {
    /// Scenario to simulate
    #[arg(value_enum, default_value_t = Scenario::AllGranted)]
    scenario: Scenario,

    /// Path to a grantflow.yaml config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated platform API level
    #[arg(long, default_value_t = 34)]
    platform_version: u32,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scenario {
    /// Every capability is already granted; the batch stage issues no prompt
    AllGranted,
    /// Camera denied in the batch, granted after the rationale
    RationaleAgree,
    /// Audio denied and the user refuses the rationale
    RationaleRefuse,
    /// Camera permanently declined; the user cancels the settings redirect
    PermanentDenial,
}

fn manifest() -> Vec<Capability> {
    vec![
        Capability::camera(),
        Capability::record_audio(),
        Capability::write_external_storage(),
        Capability::foreground_service_location(),
    ]
}

fn build_scenario(scenario: Scenario, version: u32) -> (SimulatedPlatform, ScriptedPrompter) {
    let granted_locations = |platform: SimulatedPlatform| {
        platform
            .with_response(Capability::fine_location(), true)
            .with_response(Capability::coarse_location(), true)
            .with_response(Capability::post_notifications(), true)
            .with_response(Capability::foreground_service(), true)
    };

    match scenario {
        Scenario::AllGranted => {
            let platform = SimulatedPlatform::new(version)
                .with_manifest(manifest())
                .with_granted(Capability::camera())
                .with_granted(Capability::record_audio())
                .with_granted(Capability::fine_location())
                .with_granted(Capability::coarse_location())
                .with_granted(Capability::post_notifications())
                .with_granted(Capability::foreground_service());
            (platform, ScriptedPrompter::agreeing())
        }
        Scenario::RationaleAgree => {
            let platform = SimulatedPlatform::new(version)
                .with_manifest(manifest())
                .with_granted(Capability::record_audio())
                .with_response(Capability::camera(), false)
                .with_response(Capability::camera(), true);
            let platform = granted_locations(platform);
            let prompter = ScriptedPrompter::agreeing().then_rationale(RationaleChoice::Agree);
            (platform, prompter)
        }
        Scenario::RationaleRefuse => {
            let platform = SimulatedPlatform::new(version)
                .with_manifest(manifest())
                .with_granted(Capability::camera())
                .with_response(Capability::record_audio(), false);
            let prompter = ScriptedPrompter::agreeing().then_rationale(RationaleChoice::Refuse);
            (platform, prompter)
        }
        Scenario::PermanentDenial => {
            let platform = SimulatedPlatform::new(version)
                .with_manifest(manifest())
                .with_granted(Capability::record_audio())
                .with_response(Capability::camera(), false)
                .with_permanently_declined(Capability::camera());
            let prompter = ScriptedPrompter::agreeing().then_settings(SettingsChoice::Cancel);
            (platform, prompter)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };
    logging::init(&config.logging)?;

    info!(scenario = ?cli.scenario, platform_version = cli.platform_version, "starting demo");
    let (platform, prompter) = build_scenario(cli.scenario, cli.platform_version);
    let platform = Arc::new(platform);
    let prompter = Arc::new(prompter);

    let orchestrator = StageOrchestrator::new(
        Arc::clone(&platform) as _,
        Arc::clone(&prompter) as _,
        config.negotiation,
    );
    let granted = orchestrator.negotiate().wait().await;

    println!(
        "negotiation outcome: {}",
        if granted {
            style("GRANTED").green().bold()
        } else {
            style("DENIED").red().bold()
        }
    );
    println!(
        "  batch requests:  {:?}",
        platform.batch_requests().iter().map(Vec::len).collect::<Vec<_>>()
    );
    println!("  single requests: {}", platform.single_requests().len());
    println!("  rationales:      {}", prompter.rationales_shown().len());
    println!("  settings prompts:{}", prompter.settings_prompts_shown().len());

    Ok(())
}
