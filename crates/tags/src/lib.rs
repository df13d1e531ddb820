//! # Journal Tag Constraints
//!
//! Rules attached to user-defined tags: mutual exclusion, suggestions and
//! requirements. The validator is a pure function over a catalog snapshot and
//! reports problems as data; it never rejects a selection by failing.

pub mod error;
pub mod relationships;
pub mod usage;
pub mod validator;

pub use error::TagError;
pub use relationships::{NormalizationSummary, normalize_relationships};
pub use usage::{UsageCounts, recompute_usage, usage_counts};
pub use validator::{
    SelectionValidation, TagPair, TagValidation, excludes_either_way, validate_selection,
    validate_tag_addition,
};
