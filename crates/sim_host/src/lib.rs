//! # Sim Host
//!
//! Deterministic host for the scroll engine: a virtual clock, vsync-aligned
//! frame callbacks, one-shot timers and an in-memory document.
//!
//! [`ScenarioRunner`] replays a [`contracts::Scenario`] against a fresh engine
//! and returns the records it produced.

pub mod document;
pub mod error;
pub mod host;
pub mod runner;
mod tasks;

pub use document::SimDocument;
pub use error::{Result, SimError};
pub use host::{FaultConfig, SimHost};
pub use runner::{RunReport, ScenarioRunner};
