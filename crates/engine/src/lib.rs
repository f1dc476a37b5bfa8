//! Engine crate – shared backend logic for the broken calculator app.
//!
//! This crate contains the whole game: the gated expression evaluator,
//! the unlock state machine, achievements, and settings persistence
//! behind a trait. It does NOT depend on any UI toolkit, so it can be
//! used by both a GUI wrapper and the headless CLI harness.

pub mod achievements;
pub mod calculator;
pub mod eval;
pub mod hints;
pub mod persist;
pub mod script;
pub mod store;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use calculator::Calculator;
pub use persist::{spawn_persist_worker, PersistCommand};
pub use store::{JsonFileStore, MemoryStore};
pub use traits::SettingsStore;
pub use types::{Action, Op, SavedFlags, Snapshot, Status, Theme};
