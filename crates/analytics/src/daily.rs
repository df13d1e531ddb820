use chrono::NaiveDate;
use core_types::Trade;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Closed-trade activity collapsed onto one calendar day.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DaySummary {
    pub trades: usize,
    pub pnl: Decimal,
    pub rr: Decimal,
}

/// Groups closed trades by calendar day, oldest first.
pub(crate) fn closed_by_day(trades: &[Trade]) -> BTreeMap<NaiveDate, DaySummary> {
    let mut days: BTreeMap<NaiveDate, DaySummary> = BTreeMap::new();
    for trade in trades.iter().filter(|t| t.is_closed()) {
        let day = days.entry(trade.date).or_default();
        day.trades += 1;
        day.pnl += trade.pnl;
        day.rr += trade.rr.unwrap_or(Decimal::ZERO);
    }
    days
}

/// Closed trades in chronological order. The sort is stable, so trades sharing a
/// date keep the order they were logged in.
pub(crate) fn closed_in_order(trades: &[Trade]) -> Vec<&Trade> {
    let mut closed: Vec<&Trade> = trades.iter().filter(|t| t.is_closed()).collect();
    closed.sort_by_key(|t| t.date);
    closed
}
