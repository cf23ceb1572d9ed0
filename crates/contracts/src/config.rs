//! Engine configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Scroll engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EngineConfig {
    /// Idle duration after which an interaction is considered finished (ms)
    #[validate(range(exclusive_min = 0.0))]
    pub quiet_window_ms: f64,

    /// How long an input-source hint stays attributable (ms)
    #[validate(range(exclusive_min = 0.0))]
    pub hint_ttl_ms: f64,

    /// Content must exceed the viewport by more than this to count as scrollable (px)
    #[validate(range(min = 0.0))]
    pub overflow_tolerance_px: f64,

    /// Refresh-rate measurement settings
    #[validate(nested)]
    pub refresh: RefreshConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quiet_window_ms: 150.0,
            hint_ttl_ms: 250.0,
            overflow_tolerance_px: 1.0,
            refresh: RefreshConfig::default(),
        }
    }
}

/// Refresh-rate estimator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_refresh_budget"))]
pub struct RefreshConfig {
    /// Estimate used until (and unless) a measurement succeeds (Hz)
    #[validate(range(exclusive_min = 0.0))]
    pub default_hz: f64,

    /// Maximum frame callbacks sampled per measurement
    #[validate(range(min = 2))]
    pub sample_budget: usize,

    /// Valid deltas required before the estimate is replaced
    #[validate(range(min = 1))]
    pub min_valid_deltas: usize,

    /// Deltas at or above this are discarded as stalls (ms)
    #[validate(range(exclusive_min = 0.0))]
    pub max_delta_ms: f64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            default_hz: 60.0,
            sample_budget: 60,
            min_valid_deltas: 10,
            max_delta_ms: 100.0,
        }
    }
}

fn validate_refresh_budget(config: &RefreshConfig) -> Result<(), ValidationError> {
    // N callbacks yield at most N - 1 deltas
    if config.min_valid_deltas >= config.sample_budget {
        return Err(ValidationError::new("refresh_budget").with_message(Cow::Owned(format!(
            "min_valid_deltas ({}) must be < sample_budget ({})",
            config.min_valid_deltas, config.sample_budget
        ))));
    }
    Ok(())
}
