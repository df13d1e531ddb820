//! # Journal Core Types
//!
//! The shared vocabulary of the workspace: trades, journal entries, user-defined
//! labels and the small enums every engine keys on. This crate has no logic beyond
//! record validation, which the storage layer runs before accepting input.

pub mod catalog;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use catalog::LabelCatalog;
pub use enums::{Continuity, DayOfWeek, Direction, Outcome, PeriodKind, TradeStatus};
pub use error::CoreError;
pub use structs::{Category, CustomSetup, CustomTag, JournalEntry, TagRelationships, Trade};
