//! Virtual-clock host

use contracts::{
    Axis, AxisExtent, Clock, DocumentView, FrameScheduler, HostError, InteractionRecord, NodeId,
    NodeKind, OverflowMode, ScrollOffset, TaskHandle, TimerScheduler, Wakeup,
};
use observer_registry::ObserverRegistry;
use scroll_engine::ScrollEngine;
use tracing::{instrument, trace};

use crate::document::SimDocument;
use crate::tasks::{TaskKind, TaskQueue};

/// Scheduling requests that should fail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultConfig {
    /// Every frame request fails
    pub fail_frames: bool,
    /// Every timer request fails
    pub fail_timers: bool,
}

/// Deterministic [`contracts::Host`].
///
/// Time only moves when [`SimHost::advance_to`] (or [`SimHost::set_now`]) is
/// called. Frame callbacks land on vsync boundaries, timers at `now + delay`.
#[derive(Debug)]
pub struct SimHost {
    now: f64,
    frame_interval_ms: f64,
    document: SimDocument,
    queue: TaskQueue,
    faults: FaultConfig,
}

impl SimHost {
    pub fn new(document: SimDocument, refresh_hz: f64) -> Self {
        let frame_interval_ms = if refresh_hz.is_finite() && refresh_hz > 0.0 {
            1000.0 / refresh_hz
        } else {
            1000.0 / 60.0
        };
        Self {
            now: 0.0,
            frame_interval_ms,
            document,
            queue: TaskQueue::default(),
            faults: FaultConfig::default(),
        }
    }

    pub fn with_faults(mut self, faults: FaultConfig) -> Self {
        self.faults = faults;
        self
    }

    pub fn document(&self) -> &SimDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut SimDocument {
        &mut self.document
    }

    pub fn frame_interval_ms(&self) -> f64 {
        self.frame_interval_ms
    }

    /// Jump the clock without running anything. Never moves backwards.
    pub fn set_now(&mut self, now: f64) {
        self.now = self.now.max(now);
    }

    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.queue.count(TaskKind::Frame)
    }

    pub fn pending_timers(&self) -> usize {
        self.queue.count(TaskKind::Timer)
    }

    pub fn next_due(&self) -> Option<f64> {
        self.queue.next_due()
    }

    /// First vsync boundary strictly after `now`
    fn next_vsync(&self) -> f64 {
        let k = (self.now / self.frame_interval_ms).floor() + 1.0;
        let due = k * self.frame_interval_ms;
        if due > self.now {
            due
        } else {
            due + self.frame_interval_ms
        }
    }

    /// Run every wakeup due at or before `until`, then set the clock to `until`.
    ///
    /// Finished records are emitted to `registry` (when given) and returned in
    /// emission order.
    #[instrument(name = "sim_host_advance", level = "trace", skip(self, engine, registry))]
    pub fn advance_to(
        &mut self,
        engine: &mut ScrollEngine,
        registry: Option<&ObserverRegistry>,
        until: f64,
    ) -> Vec<InteractionRecord> {
        let mut records = Vec::new();
        while let Some((due, wakeup)) = self.queue.pop_due(until) {
            self.set_now(due);
            trace!(now = self.now, ?wakeup, "wakeup");
            if let Some(record) = engine.dispatch(self, wakeup) {
                if let Some(registry) = registry {
                    registry.emit(&record);
                }
                records.push(record);
            }
        }
        self.set_now(until);
        records
    }

    /// Run until no wakeup is pending or `limit` is reached.
    pub fn run_until_idle(
        &mut self,
        engine: &mut ScrollEngine,
        registry: Option<&ObserverRegistry>,
        limit: f64,
    ) -> Vec<InteractionRecord> {
        let mut records = Vec::new();
        while engine.active_interactions() > 0 {
            match self.queue.next_due() {
                Some(due) if due <= limit => records.extend(self.advance_to(engine, registry, due)),
                _ => break,
            }
        }
        records
    }
}

impl Clock for SimHost {
    fn now(&self) -> f64 {
        self.now
    }
}

impl FrameScheduler for SimHost {
    fn request_frame(&mut self, wakeup: Wakeup) -> Result<TaskHandle, HostError> {
        if self.faults.fail_frames {
            return Err(HostError::FrameRequest("frame scheduling disabled".into()));
        }
        let due = self.next_vsync();
        Ok(self.queue.schedule(due, TaskKind::Frame, wakeup))
    }

    fn cancel_frame(&mut self, handle: TaskHandle) {
        self.queue.cancel(handle, TaskKind::Frame);
    }
}

impl TimerScheduler for SimHost {
    fn set_timeout(&mut self, delay_ms: f64, wakeup: Wakeup) -> Result<TaskHandle, HostError> {
        if self.faults.fail_timers {
            return Err(HostError::TimerRequest("timer scheduling disabled".into()));
        }
        let due = self.now + delay_ms.max(0.0);
        Ok(self.queue.schedule(due, TaskKind::Timer, wakeup))
    }

    fn clear_timeout(&mut self, handle: TaskHandle) {
        self.queue.cancel(handle, TaskKind::Timer);
    }
}

impl DocumentView for SimHost {
    fn root_scroller(&self) -> NodeId {
        self.document.root()
    }

    fn node_kind(&self, node: NodeId) -> Option<NodeKind> {
        self.document.kind(node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.document.parent_of(node)
    }

    fn overflow(&self, node: NodeId, axis: Axis) -> OverflowMode {
        self.document.overflow_of(node, axis)
    }

    fn extent(&self, node: NodeId, axis: Axis) -> AxisExtent {
        self.document.extent_of(node, axis)
    }

    fn scroll_offset(&self, node: NodeId) -> ScrollOffset {
        self.document.offset_of(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{EngineConfig, HostEvent, InteractionId, ViewportConfig};

    fn sim(refresh_hz: f64) -> SimHost {
        SimHost::new(SimDocument::new(ViewportConfig::default()), refresh_hz)
    }

    fn frame() -> Wakeup {
        Wakeup::Frame {
            surface: NodeId::new(1),
            interaction: InteractionId(1),
        }
    }

    #[test]
    fn test_frames_land_on_vsync() {
        let mut host = sim(50.0);
        host.set_now(5.0);
        host.request_frame(frame()).unwrap();
        assert_eq!(host.next_due(), Some(20.0));

        let mut host = sim(50.0);
        host.set_now(20.0);
        host.request_frame(frame()).unwrap();
        assert_eq!(host.next_due(), Some(40.0));
    }

    #[test]
    fn test_timers_and_cancel() {
        let mut host = sim(60.0);
        host.set_now(100.0);
        let handle = host.set_timeout(150.0, frame()).unwrap();
        assert_eq!(host.next_due(), Some(250.0));
        host.cancel_frame(handle);
        assert_eq!(host.pending_timers(), 1);
        host.clear_timeout(handle);
        assert_eq!(host.pending_tasks(), 0);
    }

    #[test]
    fn test_fault_injection() {
        let mut host = sim(60.0).with_faults(FaultConfig {
            fail_frames: true,
            fail_timers: false,
        });
        assert!(matches!(
            host.request_frame(frame()),
            Err(HostError::FrameRequest(_))
        ));
        assert!(host.set_timeout(10.0, frame()).is_ok());
    }

    #[test]
    fn test_clock_never_goes_back() {
        let mut host = sim(60.0);
        host.set_now(50.0);
        host.set_now(10.0);
        assert_eq!(host.now(), 50.0);
    }

    #[test]
    fn test_advance_delivers_record() {
        let mut host = sim(60.0);
        let mut engine = ScrollEngine::new(EngineConfig::default());
        let registry = ObserverRegistry::new();
        let root = host.document().root();
        let target = Some(host.document().scroll_target(root));

        engine.handle_event(&mut host, &HostEvent::Scroll { target });
        assert!(host.advance_to(&mut engine, Some(&registry), 100.0).is_empty());

        let records = host.advance_to(&mut engine, Some(&registry), 200.0);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].duration(), 150.0);
        assert_eq!(records[0].target(), Some(root));
        assert_eq!(registry.stats().emitted, 1);
        assert_eq!(host.pending_tasks(), 0);
        assert_eq!(host.now(), 200.0);
    }
}
