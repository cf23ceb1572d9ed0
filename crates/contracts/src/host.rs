//! Host primitives consumed by the engine
//!
//! The engine never owns its host. Every entry point receives the host by `&mut`
//! reference, schedules work as [`Wakeup`] tokens, and gets those tokens handed
//! back by the host when they come due.

use std::fmt;

use crate::{Axis, AxisExtent, HostError, NodeId, NodeKind, OverflowMode, ScrollOffset};

/// Opaque handle returned by a scheduling primitive, used to cancel the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub u64);

/// Identifier of one tracked interaction.
///
/// Distinguishes successive interactions on the same surface so that a stale
/// wakeup can never touch a newer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InteractionId(pub u64);

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interaction-{}", self.0)
    }
}

/// Work item the engine asks the host to call back with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wakeup {
    /// Refresh-rate measurement frame
    RefreshSample,
    /// Per-frame sampling for an interaction
    Frame {
        surface: NodeId,
        interaction: InteractionId,
    },
    /// Quiet-window expiry for an interaction
    Idle {
        surface: NodeId,
        interaction: InteractionId,
    },
}

/// Monotonic high-resolution clock, milliseconds.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Per-frame callback scheduling (requestAnimationFrame-like).
pub trait FrameScheduler {
    /// Schedule `wakeup` for the next frame.
    fn request_frame(&mut self, wakeup: Wakeup) -> Result<TaskHandle, HostError>;

    /// Cancel a pending frame request. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: TaskHandle);
}

/// One-shot timers.
pub trait TimerScheduler {
    /// Schedule `wakeup` after `delay_ms`.
    fn set_timeout(&mut self, delay_ms: f64, wakeup: Wakeup) -> Result<TaskHandle, HostError>;

    /// Cancel a pending timer. Unknown handles are ignored.
    fn clear_timeout(&mut self, handle: TaskHandle);
}

/// Style and geometry introspection of the document.
pub trait DocumentView {
    /// The single document-level scrolling surface
    fn root_scroller(&self) -> NodeId;

    /// Kind of `node`, `None` if the node is unknown or detached
    fn node_kind(&self, node: NodeId) -> Option<NodeKind>;

    /// Composed parent: crosses encapsulation boundaries to the host element
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Computed overflow mode on `axis`
    fn overflow(&self, node: NodeId, axis: Axis) -> OverflowMode;

    /// Content vs. visible extent on `axis`
    fn extent(&self, node: NodeId, axis: Axis) -> AxisExtent;

    /// Current scroll position
    fn scroll_offset(&self, node: NodeId) -> ScrollOffset;
}

/// Everything the engine needs from its environment.
pub trait Host: Clock + FrameScheduler + TimerScheduler + DocumentView {}

impl<T> Host for T where T: Clock + FrameScheduler + TimerScheduler + DocumentView {}
