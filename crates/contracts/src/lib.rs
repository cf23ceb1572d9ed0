//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the scroll-timing workspace.
//! Business crates depend only on this crate, never on each other's internals.
//!
//! ## Time Model
//! - All timestamps are host monotonic milliseconds (`f64`), as returned by [`Clock::now`]
//! - Records carry times on that same clock; no wall-clock conversion happens here

mod config;
mod error;
mod events;
mod host;
mod node;
mod record;
mod scenario;

pub use config::*;
pub use error::*;
pub use events::*;
pub use host::*;
pub use node::*;
pub use record::*;
pub use scenario::*;
