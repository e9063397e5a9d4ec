//! Classification and ordering engine for module manager lists.
//!
//! Rows mix installed modules, catalog modules, notifications, separators
//! and insets. Each build pass classifies every row once (counting visible
//! updates in a per-build [`engine::UpdateTracker`]), sorts them with a pure
//! comparator and resolves the action buttons of each module row.

pub mod agents;
pub mod capability;
pub mod engine;
pub mod error;
pub mod model;
pub mod settings;

pub use error::{ModlistError, Result};
