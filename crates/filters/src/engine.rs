use crate::spec::TradeFilter;
use chrono::NaiveDate;
use core_types::{JournalEntry, LabelCatalog, Trade};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// A `TradeFilter` with every derived lookup resolved up front, so matching a
/// trade never rescans the journal or the catalog.
#[derive(Debug, Clone)]
pub struct CompiledFilter<'f> {
    filter: &'f TradeFilter,
    needle: Option<String>,
    symbols: HashSet<String>,
    rule_breaking_days: HashSet<NaiveDate>,
    tag_names: HashMap<Uuid, String>,
    setup_names: HashMap<Uuid, String>,
}

impl<'f> CompiledFilter<'f> {
    pub fn new(filter: &'f TradeFilter, journal: &[JournalEntry], catalog: &LabelCatalog) -> Self {
        let needle = filter.needle();

        let rule_breaking_days = if filter.rule_breaking.is_some() {
            journal
                .iter()
                .filter(|e| !e.followed_system)
                .map(|e| e.date)
                .collect()
        } else {
            HashSet::new()
        };

        // Names are only needed for free-text search.
        let (tag_names, setup_names) = if needle.is_some() {
            (
                catalog.tags.iter().map(|t| (t.id, t.name.to_lowercase())).collect(),
                catalog.setups.iter().map(|s| (s.id, s.name.to_lowercase())).collect(),
            )
        } else {
            (HashMap::new(), HashMap::new())
        };

        Self {
            filter,
            needle,
            symbols: filter.symbols.iter().map(|s| s.to_uppercase()).collect(),
            rule_breaking_days,
            tag_names,
            setup_names,
        }
    }

    pub fn matches(&self, trade: &Trade) -> bool {
        let f = self.filter;

        if f.date_from.is_some_and(|from| trade.date < from) || f.date_to.is_some_and(|to| trade.date > to) {
            return false;
        }
        if !self.symbols.is_empty() && !self.symbols.contains(&trade.symbol.to_uppercase()) {
            return false;
        }
        if !f.setups.is_empty() && !trade.setup.is_some_and(|s| f.setups.contains(&s)) {
            return false;
        }
        if !f.tags.is_empty() && f.tags.is_disjoint(&trade.tags) {
            return false;
        }
        if let Some(outcome) = f.outcome {
            if !trade.is_closed() || trade.outcome() != outcome {
                return false;
            }
        }
        if f.status.is_some_and(|status| trade.status != status) {
            return false;
        }
        if f.direction.is_some_and(|direction| trade.direction != direction) {
            return false;
        }
        if !in_range(Some(trade.pnl), f.pnl_min, f.pnl_max) {
            return false;
        }
        if !in_range(trade.rr, f.rr_min, f.rr_max) {
            return false;
        }
        if let Some(wanted) = f.rule_breaking {
            if self.rule_breaking_days.contains(&trade.date) != wanted {
                return false;
            }
        }
        if f.has_notes.is_some_and(|wanted| trade.notes.trim().is_empty() == wanted) {
            return false;
        }
        if f.has_tags.is_some_and(|wanted| trade.tags.is_empty() == wanted) {
            return false;
        }
        if f.has_screenshots.is_some_and(|wanted| trade.screenshots.is_empty() == wanted) {
            return false;
        }
        if let Some(needle) = &self.needle {
            if !self.search_hit(trade, needle) {
                return false;
            }
        }
        true
    }

    fn search_hit(&self, trade: &Trade, needle: &str) -> bool {
        trade.symbol.to_lowercase().contains(needle)
            || trade.notes.to_lowercase().contains(needle)
            || trade
                .setup
                .and_then(|s| self.setup_names.get(&s))
                .is_some_and(|name| name.contains(needle))
            || trade
                .tags
                .iter()
                .filter_map(|t| self.tag_names.get(t))
                .any(|name| name.contains(needle))
    }
}

/// An unbounded range accepts anything, including a missing value; a bounded
/// range rejects a missing value instead of treating it as zero.
fn in_range(value: Option<Decimal>, min: Option<Decimal>, max: Option<Decimal>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    match value {
        Some(v) => min.is_none_or(|m| v >= m) && max.is_none_or(|m| v <= m),
        None => false,
    }
}

/// Applies `filter` in a single pass, preserving input order.
pub fn filter_trades<'t>(
    trades: &'t [Trade],
    journal: &[JournalEntry],
    catalog: &LabelCatalog,
    filter: &TradeFilter,
) -> Vec<&'t Trade> {
    if filter.is_empty() {
        return trades.iter().collect();
    }
    let compiled = CompiledFilter::new(filter, journal, catalog);
    let result: Vec<&Trade> = trades.iter().filter(|t| compiled.matches(t)).collect();
    tracing::debug!(
        input = trades.len(),
        matched = result.len(),
        dimensions = filter.active_dimensions(),
        "Filtered trades"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{CustomSetup, CustomTag, Direction, Outcome, TradeStatus};
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    struct Fixture {
        trades: Vec<Trade>,
        journal: Vec<JournalEntry>,
        catalog: LabelCatalog,
        breakout: Uuid,
        fomo: Uuid,
        orb: Uuid,
    }

    fn fixture() -> Fixture {
        let breakout = CustomTag::new("Breakout");
        let fomo = CustomTag::new("FOMO");
        let orb = CustomSetup::new("Opening Range");

        let mut t1 = Trade::closed(date(1), "ES", dec!(120));
        t1.tags.insert(breakout.id);
        t1.setup = Some(orb.id);
        t1.rr = Some(dec!(2.4));
        t1.notes = "Clean retest".to_string();

        let mut t2 = Trade::closed(date(2), "nq", dec!(-60));
        t2.tags.insert(fomo.id);
        t2.direction = Direction::Short;
        t2.rr = Some(dec!(-1));
        t2.screenshots.push("chart.png".to_string());

        let t3 = Trade::closed(date(3), "CL", dec!(0));

        let mut t4 = Trade::closed(date(4), "ES", dec!(15));
        t4.status = TradeStatus::Open;

        Fixture {
            trades: vec![t1, t2, t3, t4],
            journal: vec![JournalEntry::new(date(1), true), JournalEntry::new(date(2), false)],
            breakout: breakout.id,
            fomo: fomo.id,
            orb: orb.id,
            catalog: LabelCatalog {
                tags: vec![breakout, fomo],
                setups: vec![orb],
                categories: vec![],
            },
        }
    }

    fn run(fx: &Fixture, filter: &TradeFilter) -> Vec<String> {
        filter_trades(&fx.trades, &fx.journal, &fx.catalog, filter)
            .into_iter()
            .map(|t| format!("{}-{}", t.symbol, t.date.format("%d")))
            .collect()
    }

    #[test]
    fn empty_filter_is_identity() {
        let fx = fixture();
        let result = filter_trades(&fx.trades, &fx.journal, &fx.catalog, &TradeFilter::new());
        assert_eq!(result.len(), fx.trades.len());
        assert!(result.iter().zip(&fx.trades).all(|(a, b)| a.id == b.id));
    }

    #[test]
    fn outcome_wins_only_returns_profitable_closed_trades() {
        let fx = fixture();
        let filter = TradeFilter {
            outcome: Some(Outcome::Win),
            ..Default::default()
        };
        let result = filter_trades(&fx.trades, &fx.journal, &fx.catalog, &filter);
        assert!(!result.is_empty());
        assert!(result.iter().all(|t| t.pnl > Decimal::ZERO && t.is_closed()));

        let breakeven = TradeFilter {
            outcome: Some(Outcome::Breakeven),
            ..Default::default()
        };
        assert_eq!(run(&fx, &breakeven), vec!["CL-03"]);
    }

    #[test]
    fn rr_range_excludes_trades_without_rr() {
        let fx = fixture();
        let filter = TradeFilter {
            rr_min: Some(dec!(-5)),
            ..Default::default()
        };
        assert_eq!(run(&fx, &filter), vec!["ES-01", "nq-02"]);

        let upper = TradeFilter {
            rr_max: Some(dec!(0)),
            ..Default::default()
        };
        assert_eq!(run(&fx, &upper), vec!["nq-02"]);
    }

    #[test]
    fn or_within_dimension_and_across_dimensions() {
        let fx = fixture();
        let either_tag = TradeFilter {
            tags: [fx.breakout, fx.fomo].into(),
            ..Default::default()
        };
        assert_eq!(run(&fx, &either_tag), vec!["ES-01", "nq-02"]);

        let tag_and_symbol = TradeFilter {
            tags: [fx.breakout, fx.fomo].into(),
            symbols: ["NQ".to_string()].into(),
            ..Default::default()
        };
        assert_eq!(run(&fx, &tag_and_symbol), vec!["nq-02"]);

        let setup = TradeFilter {
            setups: [fx.orb].into(),
            direction: Some(Direction::Long),
            ..Default::default()
        };
        assert_eq!(run(&fx, &setup), vec!["ES-01"]);
    }

    #[test]
    fn search_covers_symbol_notes_setup_and_tag_names() {
        let fx = fixture();
        let search = |text: &str| TradeFilter {
            search: Some(text.to_string()),
            ..Default::default()
        };
        assert_eq!(run(&fx, &search("fomo")), vec!["nq-02"]);
        assert_eq!(run(&fx, &search("RETEST")), vec!["ES-01"]);
        assert_eq!(run(&fx, &search("opening")), vec!["ES-01"]);
        assert_eq!(run(&fx, &search("es")), vec!["ES-01", "ES-04"]);
        // Blank search is inactive.
        assert_eq!(run(&fx, &search("   ")).len(), 4);
    }

    #[test]
    fn rule_breaking_uses_journal_days() {
        let fx = fixture();
        let breaking = TradeFilter {
            rule_breaking: Some(true),
            ..Default::default()
        };
        assert_eq!(run(&fx, &breaking), vec!["nq-02"]);

        let clean = TradeFilter {
            rule_breaking: Some(false),
            ..Default::default()
        };
        assert_eq!(run(&fx, &clean), vec!["ES-01", "CL-03", "ES-04"]);
    }

    #[test]
    fn date_pnl_status_and_presence_flags() {
        let fx = fixture();
        let window = TradeFilter {
            date_from: Some(date(2)),
            date_to: Some(date(3)),
            ..Default::default()
        };
        assert_eq!(run(&fx, &window), vec!["nq-02", "CL-03"]);

        let pnl = TradeFilter {
            pnl_min: Some(dec!(0)),
            pnl_max: Some(dec!(100)),
            status: Some(TradeStatus::Closed),
            ..Default::default()
        };
        assert_eq!(run(&fx, &pnl), vec!["CL-03"]);

        let flags = TradeFilter {
            has_notes: Some(false),
            has_tags: Some(false),
            has_screenshots: Some(false),
            ..Default::default()
        };
        assert_eq!(run(&fx, &flags), vec!["CL-03", "ES-04"]);

        let screenshots = TradeFilter {
            has_screenshots: Some(true),
            ..Default::default()
        };
        assert_eq!(run(&fx, &screenshots), vec!["nq-02"]);
    }

    #[test]
    fn filter_deserializes_with_defaults() {
        let filter: TradeFilter = serde_json::from_str(r#"{"outcome": "loss"}"#).unwrap();
        assert_eq!(filter.outcome, Some(Outcome::Loss));
        assert_eq!(filter.active_dimensions(), 1);
    }
}
