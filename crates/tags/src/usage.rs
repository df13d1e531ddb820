use core_types::{LabelCatalog, Trade};
use std::collections::HashMap;
use uuid::Uuid;

/// How many trades reference each tag and setup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageCounts {
    pub tags: HashMap<Uuid, usize>,
    pub setups: HashMap<Uuid, usize>,
}

/// Counts label references across every trade, open or closed.
pub fn usage_counts(trades: &[Trade]) -> UsageCounts {
    let mut counts = UsageCounts::default();
    for trade in trades {
        for tag in &trade.tags {
            *counts.tags.entry(*tag).or_default() += 1;
        }
        if let Some(setup) = trade.setup {
            *counts.setups.entry(setup).or_default() += 1;
        }
    }
    counts
}

/// Overwrites the stored usage counters with values derived from `trades`.
pub fn recompute_usage(catalog: &mut LabelCatalog, trades: &[Trade]) {
    let counts = usage_counts(trades);
    for tag in &mut catalog.tags {
        tag.usage_count = counts.tags.get(&tag.id).copied().unwrap_or(0);
    }
    for setup in &mut catalog.setups {
        setup.usage_count = counts.setups.get(&setup.id).copied().unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{CustomSetup, CustomTag};
    use rust_decimal_macros::dec;

    #[test]
    fn stale_counters_are_replaced() {
        let mut tag = CustomTag::new("Breakout");
        tag.usage_count = 42;
        let unused = CustomTag::new("Unused");
        let setup = CustomSetup::new("ORB");
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let mut first = Trade::closed(date, "ES", dec!(1));
        first.tags.insert(tag.id);
        first.setup = Some(setup.id);
        let mut second = Trade::closed(date, "NQ", dec!(-1));
        second.tags.insert(tag.id);

        let mut catalog = LabelCatalog {
            tags: vec![tag, unused],
            setups: vec![setup],
            categories: vec![],
        };
        recompute_usage(&mut catalog, &[first, second]);

        assert_eq!(catalog.tags[0].usage_count, 2);
        assert_eq!(catalog.tags[1].usage_count, 0);
        assert_eq!(catalog.setups[0].usage_count, 1);
    }
}
