use crate::error::StorageError;
use analytics::UnlockLog;
use core_types::{JournalEntry, LabelCatalog, Trade};
use serde::Serialize;
use tags::NormalizationSummary;

/// Persistence for the trade history. `save_trades` replaces the whole collection.
pub trait TradeRecordStore {
    fn load_trades(&self) -> Result<Vec<Trade>, StorageError>;
    fn save_trades(&self, trades: &[Trade]) -> Result<(), StorageError>;
}

pub trait JournalEntryStore {
    fn load_journal(&self) -> Result<Vec<JournalEntry>, StorageError>;
    fn save_journal(&self, entries: &[JournalEntry]) -> Result<(), StorageError>;
}

/// Persistence for tags, setups and categories.
///
/// Implementations store the catalog in canonical form: relationships are
/// normalized before the write, and a catalog that fails validation is rejected.
/// `load_catalog` always returns the canonical form, even when the stored copy
/// was edited outside the store.
pub trait CatalogStore {
    fn load_catalog(&self) -> Result<LabelCatalog, StorageError>;
    fn save_catalog(&self, catalog: &LabelCatalog) -> Result<(), StorageError>;

    /// The catalog exactly as stored, before any normalization.
    fn load_catalog_as_stored(&self) -> Result<LabelCatalog, StorageError> {
        self.load_catalog()
    }
}

pub trait UnlockLogStore {
    fn load_unlock_log(&self) -> Result<UnlockLog, StorageError>;
    fn save_unlock_log(&self, log: &UnlockLog) -> Result<(), StorageError>;
}

/// Everything the engines read, loaded in one go.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JournalSnapshot {
    pub trades: Vec<Trade>,
    pub journal: Vec<JournalEntry>,
    pub catalog: LabelCatalog,
}

pub fn load_snapshot<S>(store: &S) -> Result<JournalSnapshot, StorageError>
where
    S: TradeRecordStore + JournalEntryStore + CatalogStore,
{
    let snapshot = JournalSnapshot {
        trades: store.load_trades()?,
        journal: store.load_journal()?,
        catalog: store.load_catalog()?,
    };
    tracing::debug!(
        trades = snapshot.trades.len(),
        journal_entries = snapshot.journal.len(),
        tags = snapshot.catalog.tags.len(),
        setups = snapshot.catalog.setups.len(),
        "Loaded journal snapshot"
    );
    Ok(snapshot)
}

/// Validates and normalizes a catalog in place; the shared write path of every backend.
pub fn canonicalize_catalog(catalog: &mut LabelCatalog) -> Result<NormalizationSummary, StorageError> {
    let summary = tags::normalize_relationships(&mut catalog.tags)?;
    catalog.validate()?;
    Ok(summary)
}

/// Rewrites the stored catalog with normalized relationships and usage
/// counters derived from the stored trades.
pub fn sync_catalog<S>(store: &S) -> Result<NormalizationSummary, StorageError>
where
    S: TradeRecordStore + CatalogStore,
{
    let trades = store.load_trades()?;
    let mut catalog = store.load_catalog_as_stored()?;
    let summary = canonicalize_catalog(&mut catalog)?;
    tags::recompute_usage(&mut catalog, &trades);
    store.save_catalog(&catalog)?;
    tracing::info!(
        mirrored = summary.mirrored_exclusions,
        dropped = summary.dropped_references,
        "Catalog synchronized"
    );
    Ok(summary)
}
