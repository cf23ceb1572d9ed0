//! Scenario replay pipeline: engine -> registry -> channel -> printer.

mod orchestrator;
mod stats;

pub use orchestrator::{OutputFormat, SimulationConfig, SimulationPipeline};
pub use stats::SimulationStats;
