//! Replay statistics.

use std::time::Duration;

use observability::InteractionAggregator;
use observer_registry::StatsSnapshot;
use serde_json::json;

/// Statistics from one replay
#[derive(Debug, Clone)]
pub struct SimulationStats {
    /// Scenario steps applied to the host
    pub steps_applied: usize,

    /// Virtual time the replay stopped at (ms)
    pub end_ms: f64,

    /// Refresh rate the engine settled on
    pub refresh_rate_hz: f64,

    /// Interactions still live when the replay stopped
    pub unfinished: usize,

    /// Registry delivery counters
    pub delivery: StatsSnapshot,

    /// Wall-clock time spent replaying
    pub wall_time: Duration,

    /// Aggregated interaction metrics
    pub interactions: InteractionAggregator,
}

impl SimulationStats {
    /// Summary as one JSON object
    pub fn to_json(&self) -> serde_json::Value {
        let summary = self.interactions.summary();
        json!({
            "summary": {
                "stepsApplied": self.steps_applied,
                "endMs": self.end_ms,
                "refreshRateHz": self.refresh_rate_hz,
                "interactions": summary.total_interactions,
                "unfinished": self.unfinished,
                "bySource": summary.source_counts,
                "framesExpected": summary.frames_expected,
                "framesProduced": summary.frames_produced,
                "framesDropped": summary.frames_dropped,
                "entriesEmitted": self.delivery.emitted,
                "entriesDelivered": self.delivery.delivered,
                "entriesUnobserved": self.delivery.unobserved,
            }
        })
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Replay Statistics                         ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Steps applied: {}", self.steps_applied);
        println!("   ├─ Virtual end: {:.1} ms", self.end_ms);
        println!("   ├─ Refresh rate: {:.2} Hz", self.refresh_rate_hz);
        println!("   ├─ Unfinished interactions: {}", self.unfinished);
        println!("   ├─ Entries emitted: {}", self.delivery.emitted);
        println!("   ├─ Entries unobserved: {}", self.delivery.unobserved);
        println!("   └─ Wall time: {:.3}s", self.wall_time.as_secs_f64());

        println!("\n{}", self.interactions.summary());
    }
}
