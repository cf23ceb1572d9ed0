//! Main scroll engine implementation.

use std::collections::HashMap;

use contracts::{
    EngineConfig, EventTarget, Host, HostEvent, InputEvent, InteractionId, InteractionRecord,
    NodeId, NodeKind, ScrollSource, TaskHandle, Wakeup,
};
use tracing::{debug, instrument, trace, warn};

use crate::hints::HintRecorder;
use crate::interaction::InteractionState;
use crate::refresh::RefreshRateEstimator;
use crate::resolver::SurfaceResolver;

/// Scroll interaction engine
///
/// Owns the active-surface map and the hint store. The host is borrowed per call,
/// never stored.
#[derive(Debug)]
pub struct ScrollEngine {
    /// Configuration
    config: EngineConfig,
    /// Target → surface resolution
    resolver: SurfaceResolver,
    /// Surface → input source hints
    hints: HintRecorder,
    /// Measured refresh rate
    refresh: RefreshRateEstimator,
    /// At most one live interaction per surface
    active: HashMap<NodeId, InteractionState>,
    /// Next interaction id
    next_interaction: u64,
    /// Records produced so far
    emitted: u64,
}

impl ScrollEngine {
    /// Create a new engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self {
            resolver: SurfaceResolver::new(config.overflow_tolerance_px),
            hints: HintRecorder::new(config.hint_ttl_ms),
            refresh: RefreshRateEstimator::new(config.refresh.clone()),
            active: HashMap::new(),
            next_interaction: 1,
            emitted: 0,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Kick off the one-time refresh-rate measurement.
    #[instrument(name = "scroll_engine_start", level = "debug", skip_all)]
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.refresh.begin_measurement(host);
    }

    /// Re-run the refresh measurement, e.g. after the host detected throttling.
    ///
    /// Returns `false` if a measurement is already running.
    pub fn remeasure_refresh_rate<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        self.refresh.begin_measurement(host)
    }

    /// Current refresh estimate (Hz)
    pub fn refresh_rate_hz(&self) -> f64 {
        self.refresh.current_hz()
    }

    /// Number of surfaces currently being tracked
    pub fn active_interactions(&self) -> usize {
        self.active.len()
    }

    pub fn is_tracking(&self, surface: NodeId) -> bool {
        self.active.contains_key(&surface)
    }

    /// Total records produced since creation
    pub fn records_emitted(&self) -> u64 {
        self.emitted
    }

    /// Feed one host notification
    #[instrument(name = "scroll_engine_handle_event", level = "trace", skip(self, host))]
    pub fn handle_event<H: Host + ?Sized>(&mut self, host: &mut H, event: &HostEvent) {
        match event {
            HostEvent::Scroll { target } => self.handle_scroll(host, *target),
            HostEvent::Wheel(input)
            | HostEvent::TouchStart(input)
            | HostEvent::TouchMove(input) => {
                if let Some(source) = event.hint_source() {
                    self.record_input(host, source, input);
                }
            }
            HostEvent::KeyDown(key) => {
                if let Some(source) = event.hint_source() {
                    self.record_input(host, source, &key.input);
                }
            }
        }
    }

    /// Record an input-source hint for the surface under `input`.
    pub fn record_input<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        source: ScrollSource,
        input: &InputEvent,
    ) {
        let surface = self.resolver.resolve_from_event(host, input);
        let now = host.now();
        self.hints.record(surface, source, now);
        trace!(%surface, %source, now, "input hint recorded");
        metrics::counter!("scroll_engine_hints_recorded_total", "source" => source.as_str())
            .increment(1);
    }

    /// Handle a movement notification on `target`.
    pub fn handle_scroll<H: Host + ?Sized>(&mut self, host: &mut H, target: Option<EventTarget>) {
        let now = host.now();
        let surface = self.resolve_moving_surface(host, target, now);

        if self.active.contains_key(&surface) {
            self.continue_interaction(host, surface, now);
        } else {
            self.begin_interaction(host, surface, now);
        }
    }

    /// Root-level movement may really belong to a nested surface that just
    /// received device input; prefer that surface when one is hinted.
    fn resolve_moving_surface<H: Host + ?Sized>(
        &mut self,
        host: &H,
        target: Option<EventTarget>,
        now: f64,
    ) -> NodeId {
        let surface = self.resolver.normalize(host, target);
        if surface != host.root_scroller() {
            return surface;
        }
        match self.hints.most_recent_surface(now) {
            Some(hinted) if hinted != surface => {
                debug!(%hinted, "root movement attributed to recently hinted surface");
                hinted
            }
            _ => surface,
        }
    }

    #[instrument(
        name = "scroll_engine_begin_interaction",
        level = "debug",
        skip(self, host, surface),
        fields(surface = %surface)
    )]
    fn begin_interaction<H: Host + ?Sized>(&mut self, host: &mut H, surface: NodeId, now: f64) {
        let hint = self.hints.consume(surface, now);
        let (source, start_time) = match hint {
            Some(hint) => (hint.source, hint.recorded_at),
            None => (ScrollSource::Other, now),
        };

        let id = InteractionId(self.next_interaction);
        self.next_interaction += 1;

        let baseline = host.scroll_offset(surface);
        let mut state = InteractionState::new(id, surface, source, start_time, baseline);

        state.frame_handle = request_frame(host, surface, id);
        state.idle_timer = arm_idle_timer(host, surface, id, self.config.quiet_window_ms);
        state.begin_tracking();

        debug!(%id, %source, start_time, "interaction started");
        metrics::counter!("scroll_engine_interactions_started_total").increment(1);
        self.active.insert(surface, state);
    }

    fn continue_interaction<H: Host + ?Sized>(&mut self, host: &mut H, surface: NodeId, now: f64) {
        let quiet_window_ms = self.config.quiet_window_ms;
        let Some(state) = self.active.get_mut(&surface) else {
            return;
        };

        let (dx, dy) = state.apply_movement(host.scroll_offset(surface));
        trace!(id = %state.id, phase = ?state.phase(), dx, dy, "movement accumulated");

        if let Some(handle) = state.idle_timer.take() {
            host.clear_timeout(handle);
        }
        state.idle_timer = arm_idle_timer(host, surface, state.id, quiet_window_ms);

        if state.source == ScrollSource::Other {
            if let Some(hint) = self.hints.consume(surface, now) {
                if state.upgrade_source(hint.source) {
                    debug!(id = %state.id, source = %hint.source, "interaction source upgraded");
                }
            }
        }
    }

    /// Hand a due wakeup back to the engine.
    ///
    /// Returns the finished record when the wakeup ended an interaction.
    #[instrument(name = "scroll_engine_dispatch", level = "trace", skip(self, host))]
    pub fn dispatch<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        wakeup: Wakeup,
    ) -> Option<InteractionRecord> {
        match wakeup {
            Wakeup::RefreshSample => {
                let now = host.now();
                self.refresh.on_sample(host, now);
                None
            }
            Wakeup::Frame {
                surface,
                interaction,
            } => {
                self.on_frame(host, surface, interaction);
                None
            }
            Wakeup::Idle {
                surface,
                interaction,
            } => self.finish(host, surface, Some(interaction)),
        }
    }

    fn on_frame<H: Host + ?Sized>(&mut self, host: &mut H, surface: NodeId, id: InteractionId) {
        let frame_interval_ms = self.refresh.frame_interval_ms();
        let state = match self.active.get_mut(&surface) {
            Some(state) if state.id == id && !state.is_ended() => state,
            _ => {
                trace!(%surface, %id, "stale frame callback ignored");
                return;
            }
        };

        state.frame_handle = None;
        state.record_frame(host.now(), frame_interval_ms);
        state.frame_handle = request_frame(host, surface, id);
    }

    /// End the interaction on `surface` now, as if its quiet window had elapsed.
    ///
    /// Safe to call repeatedly: only the first call yields a record.
    pub fn end_interaction<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        surface: NodeId,
    ) -> Option<InteractionRecord> {
        self.finish(host, surface, None)
    }

    #[instrument(
        name = "scroll_engine_finish",
        level = "debug",
        skip(self, host, surface),
        fields(surface = %surface)
    )]
    fn finish<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        surface: NodeId,
        expected: Option<InteractionId>,
    ) -> Option<InteractionRecord> {
        let state = self.active.get_mut(&surface)?;
        if expected.is_some_and(|id| id != state.id) {
            trace!(live = %state.id, "stale idle timer ignored");
            return None;
        }
        if !state.mark_ended() {
            return None;
        }

        let (frame, idle) = state.take_handles();
        cancel_handles(host, frame, idle);

        let state = self.active.remove(&surface)?;
        let now = host.now();
        let target_is_element = host
            .node_kind(surface)
            .is_some_and(NodeKind::is_element);
        let (record, diagnostics) =
            InteractionRecord::from_raw(state.to_raw(now, target_is_element));

        self.emitted += 1;
        debug!(
            id = %state.id,
            source = %record.scroll_source(),
            duration = record.duration(),
            frames_expected = record.frames_expected(),
            frames_produced = record.frames_produced(),
            corrections = diagnostics.len(),
            "interaction ended"
        );
        metrics::counter!(
            "scroll_engine_interactions_ended_total",
            "source" => record.scroll_source().as_str()
        )
        .increment(1);

        Some(record)
    }

    /// Tear down: cancel every pending callback and forget all state.
    ///
    /// Interactions in flight are dropped without producing records.
    #[instrument(name = "scroll_engine_reset", level = "debug", skip_all)]
    pub fn reset<H: Host + ?Sized>(&mut self, host: &mut H) {
        for (_, mut state) in self.active.drain() {
            state.mark_ended();
            let (frame, idle) = state.take_handles();
            cancel_handles(host, frame, idle);
        }
        self.hints.clear();
        self.refresh.cancel(host);
    }
}

fn request_frame<H: Host + ?Sized>(
    host: &mut H,
    surface: NodeId,
    interaction: InteractionId,
) -> Option<TaskHandle> {
    match host.request_frame(Wakeup::Frame {
        surface,
        interaction,
    }) {
        Ok(handle) => Some(handle),
        Err(error) => {
            warn!(%surface, %interaction, %error, "frame sampling unavailable for interaction");
            metrics::counter!("scroll_engine_schedule_failures_total", "kind" => "frame")
                .increment(1);
            None
        }
    }
}

fn arm_idle_timer<H: Host + ?Sized>(
    host: &mut H,
    surface: NodeId,
    interaction: InteractionId,
    quiet_window_ms: f64,
) -> Option<TaskHandle> {
    match host.set_timeout(
        quiet_window_ms,
        Wakeup::Idle {
            surface,
            interaction,
        },
    ) {
        Ok(handle) => Some(handle),
        Err(error) => {
            warn!(%surface, %interaction, %error, "idle timer unavailable for interaction");
            metrics::counter!("scroll_engine_schedule_failures_total", "kind" => "idle")
                .increment(1);
            None
        }
    }
}

fn cancel_handles<H: Host + ?Sized>(
    host: &mut H,
    frame: Option<TaskHandle>,
    idle: Option<TaskHandle>,
) {
    if let Some(handle) = frame {
        host.cancel_frame(handle);
    }
    if let Some(handle) = idle {
        host.clear_timeout(handle);
    }
}
