//! Subscription registry and fan-out

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, instrument, trace};

use contracts::InteractionRecord;

use crate::entry::{EntryList, ObserveFilter};
use crate::stats::{RegistryStats, StatsSnapshot};

/// Subscriber callback. Identity is the `Rc` allocation.
pub type ObserverCallback = Rc<dyn Fn(&EntryList)>;

struct Subscription {
    callback: ObserverCallback,
    filter: ObserveFilter,
}

fn same_callback(a: &ObserverCallback, b: &ObserverCallback) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Registry of `scroll` entry subscribers.
///
/// Shared through `Rc` and mutated through `&self`, so a callback may register
/// or unregister while an emission is in progress. Such changes take effect
/// from the next emission.
#[derive(Default)]
pub struct ObserverRegistry {
    subscriptions: RefCell<Vec<Subscription>>,
    stats: RegistryStats,
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("subscriptions", &self.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle, the usual way to hold a registry
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Subscribe `callback` with `filter`.
    ///
    /// Registering a callback again replaces its filter.
    pub fn register(&self, callback: ObserverCallback, filter: ObserveFilter) {
        let mut subscriptions = self.subscriptions.borrow_mut();
        match subscriptions
            .iter_mut()
            .find(|sub| same_callback(&sub.callback, &callback))
        {
            Some(existing) => existing.filter = filter,
            None => subscriptions.push(Subscription { callback, filter }),
        }
        debug!(subscriptions = subscriptions.len(), "observer registered");
    }

    /// Drop every subscription held by `callback`. Returns whether any existed.
    pub fn unregister(&self, callback: &ObserverCallback) -> bool {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|sub| !same_callback(&sub.callback, callback));
        let removed = subscriptions.len() != before;
        if removed {
            debug!(subscriptions = subscriptions.len(), "observer unregistered");
        }
        removed
    }

    pub fn is_registered(&self, callback: &ObserverCallback) -> bool {
        self.subscriptions
            .borrow()
            .iter()
            .any(|sub| same_callback(&sub.callback, callback))
    }

    pub fn len(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `record` to every subscriber whose filter matches its type.
    ///
    /// Each callback receives its own [`EntryList`] holding exactly `record`.
    /// Returns the number of callbacks invoked.
    #[instrument(
        name = "observer_registry_emit",
        level = "trace",
        skip(self, record),
        fields(source = %record.scroll_source())
    )]
    pub fn emit(&self, record: &InteractionRecord) -> usize {
        self.stats.inc_emitted();

        let targets: Vec<ObserverCallback> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|sub| sub.filter.matches(record.entry_type()))
            .map(|sub| Rc::clone(&sub.callback))
            .collect();

        if targets.is_empty() {
            trace!("no subscriber for entry");
            self.stats.inc_unobserved();
            return 0;
        }

        for callback in &targets {
            callback(&EntryList::new(record.clone()));
        }

        let delivered = targets.len();
        self.stats.add_delivered(delivered as u64);
        metrics::counter!("scroll_timing_entries_delivered_total").increment(delivered as u64);
        delivered
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn clear(&self) {
        self.subscriptions.borrow_mut().clear();
    }
}
