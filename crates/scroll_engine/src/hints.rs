//! Short-lived surface → input source associations.
//!
//! A movement notification never says which device caused it. A wheel, touch or
//! key notification shortly before it usually does.

use std::collections::HashMap;

use contracts::{NodeId, ScrollSource};

/// Input source observed near a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hint {
    pub source: ScrollSource,
    pub recorded_at: f64,
}

/// Per-surface hint store plus the process-wide "most recent hint" pointer.
#[derive(Debug)]
pub struct HintRecorder {
    ttl_ms: f64,
    hints: HashMap<NodeId, Hint>,
    most_recent: Option<(NodeId, f64)>,
}

impl HintRecorder {
    pub fn new(ttl_ms: f64) -> Self {
        Self {
            ttl_ms,
            hints: HashMap::new(),
            most_recent: None,
        }
    }

    #[inline]
    fn is_fresh(&self, recorded_at: f64, now: f64) -> bool {
        now - recorded_at <= self.ttl_ms
    }

    /// Remember that `source` was just observed on `surface`.
    pub fn record(&mut self, surface: NodeId, source: ScrollSource, now: f64) {
        self.prune(now);
        self.hints.insert(
            surface,
            Hint {
                source,
                recorded_at: now,
            },
        );
        self.most_recent = Some((surface, now));
    }

    /// Take the hint for `surface` if it is still fresh. Hints are single-use:
    /// a stale hint is discarded as well.
    pub fn consume(&mut self, surface: NodeId, now: f64) -> Option<Hint> {
        let hint = self.hints.remove(&surface)?;
        self.is_fresh(hint.recorded_at, now).then_some(hint)
    }

    /// Surface of the most recent hint, if still inside the TTL window.
    pub fn most_recent_surface(&mut self, now: f64) -> Option<NodeId> {
        match self.most_recent {
            Some((surface, at)) if self.is_fresh(at, now) => Some(surface),
            Some(_) => {
                self.most_recent = None;
                None
            }
            None => None,
        }
    }

    /// Drop expired hints so surfaces that stop receiving events are reclaimed.
    pub fn prune(&mut self, now: f64) {
        let ttl = self.ttl_ms;
        self.hints.retain(|_, hint| now - hint.recorded_at <= ttl);
    }

    pub fn clear(&mut self) {
        self.hints.clear();
        self.most_recent = None;
    }

    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }
}
