//! # Observer Registry
//!
//! Delivery side of the scroll timing engine.
//!
//! Responsibilities:
//! - keep the subscriptions interested in `scroll` entries
//! - hand every finished record to each matching subscriber exactly once
//! - front a host's native observer so `scroll` registrations land here while
//!   every other entry type keeps going to the native mechanism

pub mod entry;
pub mod error;
pub mod facade;
pub mod registry;
pub mod sinks;
pub mod stats;

pub use contracts::{InteractionRecord, SCROLL_ENTRY_TYPE};
pub use entry::{EntryList, ObserveFilter};
pub use error::ObserveError;
pub use facade::{supported_entry_types, NativeObserver, ScrollAwareObserver};
pub use registry::{ObserverCallback, ObserverRegistry};
pub use sinks::{channel_observer, collecting_observer, log_observer};
pub use stats::{RegistryStats, StatsSnapshot};
