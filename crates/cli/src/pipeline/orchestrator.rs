//! Pipeline orchestrator - coordinates the replay and the record printer.
//!
//! The replay itself is single-threaded and synchronous. Records leave the
//! observer registry through an unbounded channel and are printed by a tokio
//! task, so the printer never runs inside an engine callback.

use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{InteractionRecord, Scenario};
use observability::{
    record_active_interactions, record_interaction, record_refresh_rate, InteractionAggregator,
};
use observer_registry::{channel_observer, log_observer, ObserveFilter, ObserverRegistry};
use sim_host::{FaultConfig, RunReport, ScenarioRunner};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::SimulationStats;

/// How records are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    JsonLines,
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Scenario to replay
    pub scenario: Scenario,

    /// Record output format
    pub output: OutputFormat,

    /// Also log every record through tracing
    pub log_entries: bool,

    /// Host fault injection
    pub faults: FaultConfig,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct SimulationPipeline {
    config: SimulationConfig,
}

impl SimulationPipeline {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Run the replay to completion
    pub async fn run(self) -> Result<SimulationStats> {
        let started = Instant::now();

        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let printer = tokio::spawn(print_records(rx, self.config.output));

        // Everything holding the sender is dropped at the end of this call,
        // which lets the printer drain and finish.
        let report = replay(&self.config, tx)?;

        let interactions = printer.await.context("Record printer task failed")?;

        record_refresh_rate(report.refresh_rate_hz);
        record_active_interactions(report.unfinished);

        info!(
            records = report.records.len(),
            steps = report.steps_applied,
            end_ms = report.end_ms,
            unfinished = report.unfinished,
            refresh_hz = report.refresh_rate_hz,
            "Replay finished"
        );

        Ok(SimulationStats {
            steps_applied: report.steps_applied,
            end_ms: report.end_ms,
            refresh_rate_hz: report.refresh_rate_hz,
            unfinished: report.unfinished,
            delivery: report.delivery,
            wall_time: started.elapsed(),
            interactions,
        })
    }
}

fn replay(
    config: &SimulationConfig,
    tx: mpsc::UnboundedSender<InteractionRecord>,
) -> Result<RunReport> {
    let registry = ObserverRegistry::shared();
    registry.register(channel_observer(tx), ObserveFilter::scroll());
    if config.log_entries {
        registry.register(log_observer("scroll-timing"), ObserveFilter::scroll());
    }

    debug!(
        subscribers = registry.len(),
        faults = ?config.faults,
        "Starting replay"
    );

    let runner = ScenarioRunner::new(config.scenario.clone())
        .with_registry(Rc::clone(&registry))
        .with_faults(config.faults);
    let report = runner.run().context("Scenario replay failed")?;

    // Subscribers hold the channel sender
    registry.clear();
    Ok(report)
}

async fn print_records(
    mut rx: mpsc::UnboundedReceiver<InteractionRecord>,
    output: OutputFormat,
) -> InteractionAggregator {
    let mut aggregator = InteractionAggregator::new();
    let mut index = 0usize;

    while let Some(record) = rx.recv().await {
        record_interaction(&record);
        aggregator.update(&record);

        match output {
            OutputFormat::JsonLines => println!("{}", record.to_json()),
            OutputFormat::Text => println!("{}", format_record(index, &record)),
        }
        index += 1;
    }

    aggregator
}

fn format_record(index: usize, record: &InteractionRecord) -> String {
    let target = record
        .target()
        .map(|node| node.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "[{index:>3}] {source:<10} target={target:<5} start={start:>9.3} first_frame={first:>9.3} \
         duration={duration:>8.3} frames={produced}/{expected} dropped={dropped} \
         dx={dx:.1} dy={dy:.1}",
        source = record.scroll_source().as_str(),
        start = record.start_time(),
        first = record.first_frame_time(),
        duration = record.duration(),
        produced = record.frames_produced(),
        expected = record.frames_expected(),
        dropped = record.frames_dropped(),
        dx = record.distance_x(),
        dy = record.distance_y(),
    )
}
