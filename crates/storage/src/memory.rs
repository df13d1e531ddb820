use crate::error::StorageError;
use crate::repository::{
    CatalogStore, JournalEntryStore, TradeRecordStore, UnlockLogStore, canonicalize_catalog,
};
use analytics::UnlockLog;
use core_types::{JournalEntry, LabelCatalog, Trade};
use std::sync::{Mutex, MutexGuard};

/// In-process backend with the same validation rules as the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    trades: Mutex<Vec<Trade>>,
    journal: Mutex<Vec<JournalEntry>>,
    catalog: Mutex<LabelCatalog>,
    unlocks: Mutex<UnlockLog>,
}

/// Every write replaces the whole value, so a poisoned lock still guards a
/// consistent collection.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TradeRecordStore for MemoryStore {
    fn load_trades(&self) -> Result<Vec<Trade>, StorageError> {
        Ok(lock(&self.trades).clone())
    }

    fn save_trades(&self, trades: &[Trade]) -> Result<(), StorageError> {
        for trade in trades {
            trade.validate()?;
        }
        *lock(&self.trades) = trades.to_vec();
        Ok(())
    }
}

impl JournalEntryStore for MemoryStore {
    fn load_journal(&self) -> Result<Vec<JournalEntry>, StorageError> {
        Ok(lock(&self.journal).clone())
    }

    fn save_journal(&self, entries: &[JournalEntry]) -> Result<(), StorageError> {
        *lock(&self.journal) = entries.to_vec();
        Ok(())
    }
}

impl CatalogStore for MemoryStore {
    fn load_catalog(&self) -> Result<LabelCatalog, StorageError> {
        Ok(lock(&self.catalog).clone())
    }

    fn save_catalog(&self, catalog: &LabelCatalog) -> Result<(), StorageError> {
        let mut canonical = catalog.clone();
        canonicalize_catalog(&mut canonical)?;
        *lock(&self.catalog) = canonical;
        Ok(())
    }
}

impl UnlockLogStore for MemoryStore {
    fn load_unlock_log(&self) -> Result<UnlockLog, StorageError> {
        Ok(lock(&self.unlocks).clone())
    }

    fn save_unlock_log(&self, log: &UnlockLog) -> Result<(), StorageError> {
        *lock(&self.unlocks) = log.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{load_snapshot, sync_catalog};
    use chrono::NaiveDate;
    use core_types::{CustomSetup, CustomTag};
    use rust_decimal_macros::dec;

    #[test]
    fn contradictory_catalog_is_rejected_and_nothing_is_stored() {
        let store = MemoryStore::new();
        let mut a = CustomTag::new("A");
        let mut b = CustomTag::new("B");
        a.relationships.mutually_exclusive_with.insert(b.id);
        b.relationships.required_with.insert(a.id);

        let err = store
            .save_catalog(&LabelCatalog {
                tags: vec![a, b],
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, StorageError::Tag(_)));
        assert!(store.load_catalog().unwrap().tags.is_empty());
    }

    #[test]
    fn sync_catalog_recomputes_usage_from_stored_trades() {
        let store = MemoryStore::new();
        let tag = CustomTag::new("Breakout");
        let setup = CustomSetup::new("ORB");
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

        let mut trade = Trade::closed(date, "ES", dec!(40));
        trade.tags.insert(tag.id);
        trade.setup = Some(setup.id);
        store.save_trades(&[trade.clone(), trade]).unwrap();
        store
            .save_catalog(&LabelCatalog {
                tags: vec![tag],
                setups: vec![setup],
                ..Default::default()
            })
            .unwrap();

        sync_catalog(&store).unwrap();
        let snapshot = load_snapshot(&store).unwrap();
        assert_eq!(snapshot.catalog.tags[0].usage_count, 2);
        assert_eq!(snapshot.catalog.setups[0].usage_count, 2);
        assert_eq!(snapshot.trades.len(), 2);
    }
}
