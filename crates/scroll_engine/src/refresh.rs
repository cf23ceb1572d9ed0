//! Refresh-rate estimation from consecutive frame callbacks.

use contracts::{FrameScheduler, RefreshConfig, TaskHandle, Wakeup};
use tracing::{debug, warn};

/// Estimate the refresh rate from frame deltas.
///
/// Deltas outside `(0, max_delta_ms)` are discarded. Returns `None` when none or
/// fewer than `min_valid_deltas` survive, otherwise `1000 / median`.
pub fn estimate_from_deltas(deltas: &[f64], config: &RefreshConfig) -> Option<f64> {
    let mut valid: Vec<f64> = deltas
        .iter()
        .copied()
        .filter(|d| is_valid_delta(*d, config.max_delta_ms))
        .collect();

    if valid.is_empty() || valid.len() < config.min_valid_deltas {
        return None;
    }

    valid.sort_by(f64::total_cmp);
    let mid = valid.len() / 2;
    let median = if valid.len() % 2 == 0 {
        (valid[mid - 1] + valid[mid]) / 2.0
    } else {
        valid[mid]
    };
    Some(1000.0 / median)
}

fn is_valid_delta(delta: f64, max_delta_ms: f64) -> bool {
    delta > 0.0 && delta < max_delta_ms
}

/// Measures the host's actual update frequency once, on demand.
#[derive(Debug)]
pub struct RefreshRateEstimator {
    config: RefreshConfig,
    estimate_hz: f64,
    measuring: bool,
    callbacks_seen: usize,
    last_timestamp: Option<f64>,
    deltas: Vec<f64>,
    pending: Option<TaskHandle>,
}

impl RefreshRateEstimator {
    pub fn new(config: RefreshConfig) -> Self {
        let estimate_hz = config.default_hz;
        let capacity = config.sample_budget;
        Self {
            config,
            estimate_hz,
            measuring: false,
            callbacks_seen: 0,
            last_timestamp: None,
            deltas: Vec::with_capacity(capacity),
            pending: None,
        }
    }

    /// Current estimate in Hz
    pub fn current_hz(&self) -> f64 {
        self.estimate_hz
    }

    /// Expected duration of one frame at the current estimate (ms)
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.estimate_hz
    }

    pub fn is_measuring(&self) -> bool {
        self.measuring
    }

    /// Start sampling frame callbacks. No-op while a measurement is running.
    ///
    /// Returns whether a new measurement was started.
    pub fn begin_measurement<H: FrameScheduler + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.measuring {
            return false;
        }
        self.measuring = true;
        self.callbacks_seen = 0;
        self.last_timestamp = None;
        self.deltas.clear();
        debug!(budget = self.config.sample_budget, "refresh measurement started");
        self.request_next(host);
        self.measuring
    }

    /// Handle one measurement frame callback at `timestamp`.
    pub fn on_sample<H: FrameScheduler + ?Sized>(&mut self, host: &mut H, timestamp: f64) {
        if !self.measuring {
            return;
        }
        self.pending = None;
        self.callbacks_seen += 1;

        if let Some(last) = self.last_timestamp {
            let delta = timestamp - last;
            if is_valid_delta(delta, self.config.max_delta_ms) {
                self.deltas.push(delta);
            }
        }
        self.last_timestamp = Some(timestamp);

        if self.callbacks_seen >= self.config.sample_budget {
            self.finish();
        } else {
            self.request_next(host);
        }
    }

    /// Abort a running measurement, keeping the previous estimate.
    pub fn cancel<H: FrameScheduler + ?Sized>(&mut self, host: &mut H) {
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }
        self.measuring = false;
    }

    fn request_next<H: FrameScheduler + ?Sized>(&mut self, host: &mut H) {
        match host.request_frame(Wakeup::RefreshSample) {
            Ok(handle) => self.pending = Some(handle),
            Err(error) => {
                warn!(%error, "refresh measurement aborted, keeping previous estimate");
                metrics::counter!("scroll_engine_schedule_failures_total", "kind" => "refresh")
                    .increment(1);
                self.measuring = false;
            }
        }
    }

    fn finish(&mut self) {
        self.measuring = false;
        match estimate_from_deltas(&self.deltas, &self.config) {
            Some(hz) => {
                debug!(
                    hz,
                    valid_deltas = self.deltas.len(),
                    "refresh measurement complete"
                );
                self.estimate_hz = hz;
                metrics::gauge!("scroll_engine_refresh_rate_hz").set(hz);
            }
            None => {
                warn!(
                    valid_deltas = self.deltas.len(),
                    required = self.config.min_valid_deltas,
                    previous_hz = self.estimate_hz,
                    "too few valid frame deltas, keeping previous estimate"
                );
            }
        }
    }
}
