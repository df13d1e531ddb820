use crate::error::StorageError;
use crate::repository::{
    CatalogStore, JournalEntryStore, TradeRecordStore, UnlockLogStore, canonicalize_catalog,
};
use analytics::UnlockLog;
use core_types::{JournalEntry, LabelCatalog, Trade};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tags::NormalizationSummary;

const TRADES_FILE: &str = "trades.json";
const JOURNAL_FILE: &str = "journal.json";
const CATALOG_FILE: &str = "catalog.json";
const UNLOCKS_FILE: &str = "unlocks.json";

/// Stores each collection as one JSON document inside a data directory.
///
/// A collection whose file does not exist yet reads as empty. Writes go to a
/// sibling temporary file that is then renamed over the target, so a crash
/// never leaves a half-written collection behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (and creates, if needed) the data directory.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|source| StorageError::Io {
            path: data_dir.clone(),
            source,
        })?;
        tracing::debug!(data_dir = %data_dir.display(), "Opened JSON file store");
        Ok(Self { data_dir })
    }

    fn read<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, StorageError> {
        let path = self.data_dir.join(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        serde_json::from_slice(&bytes).map_err(|source| StorageError::Json { path, source })
    }

    fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), StorageError> {
        let path = self.data_dir.join(name);
        let tmp = self.data_dir.join(format!("{name}.tmp"));
        let json = serde_json::to_vec_pretty(value).map_err(|source| StorageError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&tmp, json).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(file = %path.display(), "Wrote collection");
        Ok(())
    }
}

impl TradeRecordStore for JsonFileStore {
    fn load_trades(&self) -> Result<Vec<Trade>, StorageError> {
        let trades: Vec<Trade> = self.read(TRADES_FILE)?;
        for trade in &trades {
            trade.validate()?;
        }
        Ok(trades)
    }

    fn save_trades(&self, trades: &[Trade]) -> Result<(), StorageError> {
        for trade in trades {
            trade.validate()?;
        }
        self.write(TRADES_FILE, trades)
    }
}

impl JournalEntryStore for JsonFileStore {
    fn load_journal(&self) -> Result<Vec<JournalEntry>, StorageError> {
        self.read(JOURNAL_FILE)
    }

    fn save_journal(&self, entries: &[JournalEntry]) -> Result<(), StorageError> {
        self.write(JOURNAL_FILE, entries)
    }
}

impl CatalogStore for JsonFileStore {
    fn load_catalog(&self) -> Result<LabelCatalog, StorageError> {
        let mut catalog = self.load_catalog_as_stored()?;
        let summary = canonicalize_catalog(&mut catalog)?;
        if summary != NormalizationSummary::default() {
            tracing::warn!(
                mirrored = summary.mirrored_exclusions,
                dropped = summary.dropped_references,
                "Catalog file is not normalized; run `journal tags normalize` to rewrite it"
            );
        }
        Ok(catalog)
    }

    fn load_catalog_as_stored(&self) -> Result<LabelCatalog, StorageError> {
        self.read(CATALOG_FILE)
    }

    fn save_catalog(&self, catalog: &LabelCatalog) -> Result<(), StorageError> {
        let mut canonical = catalog.clone();
        canonicalize_catalog(&mut canonical)?;
        self.write(CATALOG_FILE, &canonical)
    }
}

impl UnlockLogStore for JsonFileStore {
    fn load_unlock_log(&self) -> Result<UnlockLog, StorageError> {
        self.read(UNLOCKS_FILE)
    }

    fn save_unlock_log(&self, log: &UnlockLog) -> Result<(), StorageError> {
        self.write(UNLOCKS_FILE, log)
    }
}
