//! Scenario - Config Loader output
//!
//! A synthetic document plus a timed input script, replayed against the engine on
//! a virtual clock.

use serde::{Deserialize, Serialize};

use crate::{EngineConfig, NodeKind, OverflowMode};

/// Surface id reserved for the document-level scroller
pub const ROOT_SURFACE: &str = "root";

/// Scenario format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScenarioVersion {
    #[default]
    V1,
}

/// Complete scenario description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub version: ScenarioVersion,

    /// Engine tuning
    #[serde(default)]
    pub engine: EngineConfig,

    /// Simulated display
    #[serde(default)]
    pub display: DisplayConfig,

    /// Size of the document-level scroller
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Nested surfaces, parents declared before children
    #[serde(default)]
    pub surfaces: Vec<SurfaceConfig>,

    /// Timed input script
    #[serde(default)]
    pub steps: Vec<Step>,

    /// Keep the clock running until this time (ms)
    #[serde(default)]
    pub run_until_ms: Option<f64>,
}

impl Scenario {
    /// End of the replay: explicit `run_until_ms`, else enough slack after the last
    /// step for every pending interaction to settle.
    pub fn effective_end_ms(&self) -> f64 {
        self.run_until_ms.unwrap_or_else(|| {
            let last = self.steps.last().map(|s| s.at_ms).unwrap_or(0.0);
            last + self.engine.quiet_window_ms + self.engine.hint_ttl_ms + 100.0
        })
    }
}

/// Simulated display settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Real update frequency of the simulated display (Hz)
    #[serde(default = "default_refresh_hz")]
    pub refresh_hz: f64,
}

fn default_refresh_hz() -> f64 {
    60.0
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_hz: default_refresh_hz(),
        }
    }
}

/// Document-level scroller geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
    pub content_width: f64,
    pub content_height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            content_width: 1280.0,
            content_height: 4000.0,
        }
    }
}

/// One nested surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Unique identifier
    pub id: String,

    /// Parent surface id (defaults to the document root)
    #[serde(default)]
    pub parent: Option<String>,

    /// Node kind (defaults to element)
    #[serde(default = "default_surface_kind")]
    pub kind: NodeKind,

    #[serde(default)]
    pub overflow_x: OverflowMode,

    #[serde(default)]
    pub overflow_y: OverflowMode,

    #[serde(default)]
    pub content_width: f64,

    #[serde(default)]
    pub content_height: f64,

    #[serde(default)]
    pub visible_width: f64,

    #[serde(default)]
    pub visible_height: f64,
}

fn default_surface_kind() -> NodeKind {
    NodeKind::Element
}

/// A scripted host notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Virtual time of the notification (ms)
    pub at_ms: f64,

    /// Surface the notification is aimed at
    #[serde(default = "default_step_target")]
    pub target: String,

    #[serde(flatten)]
    pub action: StepAction,
}

fn default_step_target() -> String {
    ROOT_SURFACE.to_string()
}

/// What happens at a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    Wheel,
    TouchStart,
    TouchMove,
    Key {
        key: String,
    },
    /// Move the target's offset, then report movement on the target
    Scroll {
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
    },
    /// Move the target's offset, but report movement at document level
    ScrollRoot {
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
    },
}
