//! Per-surface interaction state.

use std::borrow::Cow;

use contracts::{InteractionId, NodeId, RawRecord, ScrollOffset, ScrollSource, TaskHandle};

/// Lifecycle of one interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Created,
    Tracking,
    Ended,
}

/// Mutable bookkeeping for an interaction in flight.
///
/// Owned by the engine's active map and dropped when the interaction ends.
#[derive(Debug)]
pub(crate) struct InteractionState {
    pub id: InteractionId,
    pub surface: NodeId,
    pub source: ScrollSource,
    pub start_time: f64,
    pub first_frame_time: Option<f64>,
    pub frame_count: u32,
    pub expected_frame_count: u32,
    pub last_frame_timestamp: Option<f64>,
    pub last_offset: ScrollOffset,
    pub cumulative_x: f64,
    pub cumulative_y: f64,
    pub idle_timer: Option<TaskHandle>,
    pub frame_handle: Option<TaskHandle>,
    phase: Phase,
}

impl InteractionState {
    pub fn new(
        id: InteractionId,
        surface: NodeId,
        source: ScrollSource,
        start_time: f64,
        baseline: ScrollOffset,
    ) -> Self {
        Self {
            id,
            surface,
            source,
            start_time,
            first_frame_time: None,
            frame_count: 0,
            expected_frame_count: 0,
            last_frame_timestamp: None,
            last_offset: baseline,
            cumulative_x: 0.0,
            cumulative_y: 0.0,
            idle_timer: None,
            frame_handle: None,
            phase: Phase::Created,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn begin_tracking(&mut self) {
        if self.phase == Phase::Created {
            self.phase = Phase::Tracking;
        }
    }

    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    /// Move to `Ended`. Returns `false` if the state had already ended.
    pub fn mark_ended(&mut self) -> bool {
        if self.phase == Phase::Ended {
            return false;
        }
        self.phase = Phase::Ended;
        true
    }

    /// Accumulate the signed displacement since the last notification.
    pub fn apply_movement(&mut self, offset: ScrollOffset) -> (f64, f64) {
        let dx = offset.x - self.last_offset.x;
        let dy = offset.y - self.last_offset.y;
        self.cumulative_x += dx;
        self.cumulative_y += dy;
        self.last_offset = offset;
        (dx, dy)
    }

    /// Replace an unattributed source. Happens at most once: once the source is
    /// anything but `Other` this is a no-op.
    pub fn upgrade_source(&mut self, source: ScrollSource) -> bool {
        if self.source != ScrollSource::Other || source == ScrollSource::Other {
            return false;
        }
        self.source = source;
        true
    }

    /// Account for one produced frame at `now`.
    ///
    /// The first frame counts as one expected frame; later frames add however many
    /// refresh intervals elapsed since the previous one (at least one).
    pub fn record_frame(&mut self, now: f64, frame_interval_ms: f64) {
        let expected = match self.last_frame_timestamp {
            None => {
                self.first_frame_time = Some(now.max(self.start_time));
                1
            }
            Some(last) => {
                let elapsed = (now - last).max(0.0);
                let intervals = if frame_interval_ms > 0.0 {
                    (elapsed / frame_interval_ms).round()
                } else {
                    1.0
                };
                intervals.clamp(1.0, u32::MAX as f64) as u32
            }
        };
        self.expected_frame_count = self.expected_frame_count.saturating_add(expected);
        self.frame_count = self.frame_count.saturating_add(1);
        self.last_frame_timestamp = Some(now);
    }

    /// Take both pending handles so they can be cancelled together.
    pub fn take_handles(&mut self) -> (Option<TaskHandle>, Option<TaskHandle>) {
        (self.frame_handle.take(), self.idle_timer.take())
    }

    /// Snapshot into an unchecked record as of `now`.
    pub fn to_raw(&self, now: f64, target_is_element: bool) -> RawRecord {
        RawRecord {
            start_time: self.start_time,
            first_frame_time: self.first_frame_time,
            duration: now - self.start_time,
            frames_expected: self.expected_frame_count as f64,
            frames_produced: self.frame_count as f64,
            scroll_source: Cow::Borrowed(self.source.as_str()),
            target: Some(self.surface),
            target_is_element,
            distance_x: self.cumulative_x,
            distance_y: self.cumulative_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(source: ScrollSource, start: f64) -> InteractionState {
        InteractionState::new(
            InteractionId(1),
            NodeId::new(3),
            source,
            start,
            ScrollOffset { x: 100.0, y: 100.0 },
        )
    }

    #[test]
    fn test_cumulative_distance() {
        let mut s = state(ScrollSource::Wheel, 0.0);
        s.apply_movement(ScrollOffset { x: 95.0, y: 110.0 });
        s.apply_movement(ScrollOffset { x: 98.0, y: 108.0 });
        assert_eq!(s.cumulative_x, -2.0);
        assert_eq!(s.cumulative_y, 8.0);
    }

    #[test]
    fn test_unchanged_offset_adds_nothing() {
        let mut s = state(ScrollSource::Wheel, 0.0);
        assert_eq!(s.apply_movement(ScrollOffset { x: 100.0, y: 100.0 }), (0.0, 0.0));
        assert_eq!((s.cumulative_x, s.cumulative_y), (0.0, 0.0));
    }

    #[test]
    fn test_source_upgrades_once() {
        let mut s = state(ScrollSource::Other, 0.0);
        assert!(s.upgrade_source(ScrollSource::Touch));
        assert!(!s.upgrade_source(ScrollSource::Wheel));
        assert_eq!(s.source, ScrollSource::Touch);
    }

    #[test]
    fn test_frame_accounting() {
        let mut s = state(ScrollSource::Wheel, 10.0);
        s.record_frame(5.0, 16.0);
        assert_eq!(s.first_frame_time, Some(10.0));
        assert_eq!((s.frame_count, s.expected_frame_count), (1, 1));

        s.record_frame(21.0, 16.0);
        assert_eq!((s.frame_count, s.expected_frame_count), (2, 2));

        // three intervals elapsed, one frame produced
        s.record_frame(69.0, 16.0);
        assert_eq!((s.frame_count, s.expected_frame_count), (3, 5));

        // early callback still counts as one expected frame
        s.record_frame(70.0, 16.0);
        assert_eq!((s.frame_count, s.expected_frame_count), (4, 6));
    }

    #[test]
    fn test_phase_transitions() {
        let mut s = state(ScrollSource::Other, 0.0);
        assert_eq!(s.phase(), Phase::Created);
        s.begin_tracking();
        assert_eq!(s.phase(), Phase::Tracking);
        assert!(s.mark_ended());
        assert!(!s.mark_ended());
        s.begin_tracking();
        assert!(s.is_ended());
    }

    #[test]
    fn test_to_raw() {
        let mut s = state(ScrollSource::Keyboard, 40.0);
        s.record_frame(50.0, 16.0);
        let raw = s.to_raw(290.0, true);
        assert_eq!(raw.duration, 250.0);
        assert_eq!(raw.first_frame_time, Some(50.0));
        assert_eq!(raw.scroll_source, "keyboard");
        assert_eq!(raw.target, Some(NodeId::new(3)));
    }
}
