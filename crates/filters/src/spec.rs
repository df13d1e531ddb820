use chrono::NaiveDate;
use core_types::{Direction, Outcome, TradeStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A set of independently optional trade predicates.
///
/// Unset fields and empty sets do not constrain anything. Within a multi-select
/// dimension (symbols, setups, tags) any member matches; across dimensions every
/// active predicate must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeFilter {
    /// Case-insensitive substring over symbol, setup name, notes and tag names.
    pub search: Option<String>,
    /// Inclusive.
    pub date_from: Option<NaiveDate>,
    /// Inclusive.
    pub date_to: Option<NaiveDate>,
    /// Matched case-insensitively.
    pub symbols: BTreeSet<String>,
    pub setups: BTreeSet<Uuid>,
    pub tags: BTreeSet<Uuid>,
    /// Only closed trades have an outcome; open trades never match this predicate.
    pub outcome: Option<Outcome>,
    pub status: Option<TradeStatus>,
    pub direction: Option<Direction>,
    pub pnl_min: Option<Decimal>,
    pub pnl_max: Option<Decimal>,
    /// When either R bound is set, trades without an R-multiple are excluded.
    pub rr_min: Option<Decimal>,
    pub rr_max: Option<Decimal>,
    /// `Some(true)` keeps trades taken on days journaled as not following the
    /// system; `Some(false)` keeps all others.
    pub rule_breaking: Option<bool>,
    pub has_notes: Option<bool>,
    pub has_tags: Option<bool>,
    pub has_screenshots: Option<bool>,
}

impl TradeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The search text, trimmed and lowercased, if it is not blank.
    pub(crate) fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Number of predicates that actually constrain the result.
    pub fn active_dimensions(&self) -> usize {
        [
            self.needle().is_some(),
            self.date_from.is_some() || self.date_to.is_some(),
            !self.symbols.is_empty(),
            !self.setups.is_empty(),
            !self.tags.is_empty(),
            self.outcome.is_some(),
            self.status.is_some(),
            self.direction.is_some(),
            self.pnl_min.is_some() || self.pnl_max.is_some(),
            self.rr_min.is_some() || self.rr_max.is_some(),
            self.rule_breaking.is_some(),
            self.has_notes.is_some(),
            self.has_tags.is_some(),
            self.has_screenshots.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_dimensions() == 0
    }
}
