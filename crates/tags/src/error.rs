use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("Tag {0} is not in the catalog")]
    UnknownTag(Uuid),

    #[error("Tag '{tag}' both requires and excludes '{other}'")]
    ContradictoryRelationship { tag: String, other: String },
}
