//! Scroll-aware front for a host's native observer mechanism
//!
//! `scroll` entries are synthesized by this engine, so the native mechanism
//! never knows about them. The façade keeps the native registration contract
//! (`observe` / `disconnect`) and splits each request: the `scroll` part goes
//! to the [`ObserverRegistry`], everything else to the wrapped native observer.

use std::rc::Rc;

use tracing::{debug, instrument};

use contracts::SCROLL_ENTRY_TYPE;

use crate::entry::ObserveFilter;
use crate::error::ObserveError;
use crate::registry::{ObserverCallback, ObserverRegistry};

/// The host's own observer for built-in entry types.
pub trait NativeObserver {
    /// Start delivering the entry types named by `filter`.
    fn observe(&mut self, filter: &ObserveFilter) -> Result<(), ObserveError>;

    /// Stop all delivery.
    fn disconnect(&mut self);

    /// Entry types the native mechanism can deliver
    fn supported_entry_types(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Entry types observable through a [`ScrollAwareObserver`] wrapping `native`:
/// the native list plus `scroll`, sorted and deduplicated.
pub fn supported_entry_types<N: NativeObserver + ?Sized>(native: &N) -> Vec<String> {
    let mut types = native.supported_entry_types();
    types.push(SCROLL_ENTRY_TYPE.to_string());
    types.sort();
    types.dedup();
    types
}

/// Observer that answers for `scroll` itself and defers the rest.
pub struct ScrollAwareObserver<N: NativeObserver> {
    native: N,
    registry: Rc<ObserverRegistry>,
    callback: ObserverCallback,
}

impl<N: NativeObserver> ScrollAwareObserver<N> {
    pub fn new(native: N, registry: Rc<ObserverRegistry>, callback: ObserverCallback) -> Self {
        Self {
            native,
            registry,
            callback,
        }
    }

    /// Register interest in the entry types named by `filter`.
    ///
    /// Errors from the native mechanism propagate unchanged, except a rejection
    /// of `scroll` itself, which is this observer's job to supply.
    #[instrument(
        name = "scroll_aware_observe",
        level = "debug",
        skip(self, filter),
        fields(entry_types = ?filter.entry_types)
    )]
    pub fn observe(&mut self, filter: ObserveFilter) -> Result<(), ObserveError> {
        if filter.is_empty() {
            return Err(ObserveError::EmptyFilter);
        }

        // Native first: a failed request must not leave scroll delivery live.
        let rest = filter.without(SCROLL_ENTRY_TYPE);
        if !rest.is_empty() {
            match self.native.observe(&rest) {
                Err(error) if error.is_unsupported(SCROLL_ENTRY_TYPE) => {
                    debug!("native observer rejected scroll entries, served by registry");
                }
                other => other?,
            }
        }

        if filter.matches(SCROLL_ENTRY_TYPE) {
            self.registry
                .register(Rc::clone(&self.callback), filter.only(SCROLL_ENTRY_TYPE));
        }
        Ok(())
    }

    /// Stop delivery from both the registry and the native mechanism.
    pub fn disconnect(&mut self) {
        self.registry.unregister(&self.callback);
        self.native.disconnect();
    }

    pub fn supported_entry_types(&self) -> Vec<String> {
        supported_entry_types(&self.native)
    }

    /// Whether `scroll` entries are currently being delivered to this observer
    pub fn observes_scroll(&self) -> bool {
        self.registry.is_registered(&self.callback)
    }

    pub fn native(&self) -> &N {
        &self.native
    }
}
