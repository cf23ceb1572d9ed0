//! `simulate` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use config_loader::{ConfigDocument, ConfigLoader};
use contracts::Scenario;
use sim_host::FaultConfig;
use tracing::info;

use crate::cli::SimulateArgs;
use crate::error::{ensure_exists, CliError};
use crate::pipeline::{OutputFormat, SimulationConfig, SimulationPipeline};

/// Execute the `simulate` command
pub async fn run_simulate(args: &SimulateArgs) -> Result<()> {
    info!(scenario = %args.scenario.display(), "Loading scenario");

    let mut scenario = load_scenario(&args.scenario)?;

    if let Some(hz) = args.refresh_hz {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(
                CliError::invalid_override("refresh-hz", "must be a positive number").into(),
            );
        }
        info!(refresh_hz = hz, "Overriding display refresh rate from CLI");
        scenario.display.refresh_hz = hz;
    }

    info!(
        surfaces = scenario.surfaces.len(),
        steps = scenario.steps.len(),
        refresh_hz = scenario.display.refresh_hz,
        end_ms = scenario.effective_end_ms(),
        "Scenario loaded"
    );

    let output = if args.json {
        OutputFormat::JsonLines
    } else {
        OutputFormat::Text
    };

    let pipeline = SimulationPipeline::new(SimulationConfig {
        scenario,
        output,
        log_entries: args.log_entries,
        faults: FaultConfig {
            fail_frames: args.fail_frames,
            fail_timers: args.fail_timers,
        },
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    });

    let stats = pipeline.run().await.context("Simulation failed")?;

    match output {
        OutputFormat::JsonLines => println!("{}", stats.to_json()),
        OutputFormat::Text => stats.print_summary(),
    }

    Ok(())
}

/// Load a file that must be a scenario, not an engine config
pub(super) fn load_scenario(path: &Path) -> Result<Scenario> {
    ensure_exists(path)?;
    let document = ConfigLoader::load_any(path)
        .with_context(|| format!("Failed to load scenario from {}", path.display()))?;
    match document {
        ConfigDocument::Scenario(scenario) => Ok(*scenario),
        ConfigDocument::Engine(_) => {
            Err(CliError::wrong_document(path, "scenario", "engine config").into())
        }
    }
}
