//! Delivery counters

use std::cell::Cell;

/// Counters for one registry. Single-threaded, like the registry itself.
#[derive(Debug, Default)]
pub struct RegistryStats {
    /// Records handed to `emit`
    emitted: Cell<u64>,
    /// Callback invocations
    delivered: Cell<u64>,
    /// Records no subscriber was interested in
    unobserved: Cell<u64>,
}

impl RegistryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> u64 {
        self.emitted.get()
    }

    pub fn inc_emitted(&self) {
        self.emitted.set(self.emitted.get() + 1);
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.get()
    }

    pub fn add_delivered(&self, count: u64) {
        self.delivered.set(self.delivered.get() + count);
    }

    pub fn unobserved(&self) -> u64 {
        self.unobserved.get()
    }

    pub fn inc_unobserved(&self) {
        self.unobserved.set(self.unobserved.get() + 1);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            emitted: self.emitted(),
            delivered: self.delivered(),
            unobserved: self.unobserved(),
        }
    }
}

/// Point-in-time copy of [`RegistryStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub emitted: u64,
    pub delivered: u64,
    pub unobserved: u64,
}
