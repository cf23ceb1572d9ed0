//! # Scroll Engine
//!
//! Turns movement notifications, input hints, frame callbacks and idle timers into
//! finished scroll interaction records.
//!
//! Responsibilities:
//! - measure the host's real refresh rate
//! - attribute movement to an input source through short-lived hints
//! - resolve event targets to canonical scrolling surfaces
//! - run one interaction state machine per actively scrolling surface
//!
//! ## Example
//!
//! ```ignore
//! use scroll_engine::{EngineConfig, ScrollEngine};
//!
//! let mut engine = ScrollEngine::new(EngineConfig::default());
//! engine.start(&mut host);
//!
//! // Feed notifications as they arrive
//! engine.handle_event(&mut host, &event);
//!
//! // Hand due wakeups back; finished interactions come out here
//! if let Some(record) = engine.dispatch(&mut host, wakeup) {
//!     registry.emit(&record);
//! }
//! ```

mod engine;
mod hints;
mod interaction;
mod refresh;
mod resolver;

pub use contracts::{EngineConfig, InteractionRecord, RefreshConfig, ScrollSource};
pub use engine::ScrollEngine;
pub use hints::{Hint, HintRecorder};
pub use refresh::{estimate_from_deltas, RefreshRateEstimator};
pub use resolver::SurfaceResolver;
