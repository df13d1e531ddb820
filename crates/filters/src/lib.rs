//! # Trade Filters
//!
//! Multi-dimensional trade filtering for the journal views.
//!
//! A [`TradeFilter`] describes what to keep; [`filter_trades`] applies it in one
//! pass. Lookups that depend on the journal or the label catalog (rule-breaking
//! days, lowercase tag and setup names) are resolved once per call by
//! [`CompiledFilter`].

pub mod engine;
pub mod spec;

pub use engine::{CompiledFilter, filter_trades};
pub use spec::TradeFilter;
