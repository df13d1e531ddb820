//! # Journal Storage Crate
//!
//! Persistence for trades, journal entries, the label catalog and the
//! achievement unlock log.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** The engines never touch storage; the binary loads a
//!   [`JournalSnapshot`] and hands plain slices to them.
//! - **Validated Boundaries:** Records are validated on load and on save, and the
//!   tag catalog is written in canonical form (symmetric exclusions, no dangling
//!   references).
//!
//! ## Public API
//!
//! - `TradeRecordStore`, `JournalEntryStore`, `CatalogStore`, `UnlockLogStore`: one
//!   trait per collection.
//! - `JsonFileStore`: one JSON document per collection in a data directory.
//! - `MemoryStore`: in-process backend for tests and embedding.
//! - `load_snapshot`, `sync_catalog`: helpers spanning several collections.

pub mod error;
pub mod json_file;
pub mod memory;
pub mod repository;

pub use error::StorageError;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use repository::{
    CatalogStore, JournalEntryStore, JournalSnapshot, TradeRecordStore, UnlockLogStore,
    canonicalize_catalog, load_snapshot, sync_catalog,
};
