use core_types::CoreError;
use std::path::PathBuf;
use tags::TagError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] CoreError),

    #[error("Invalid tag catalog: {0}")]
    Tag(#[from] TagError),
}
