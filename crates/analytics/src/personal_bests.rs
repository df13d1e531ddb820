use crate::daily::{closed_by_day, closed_in_order};
use crate::engine::trade_runs;
use chrono::{Datelike, Days, NaiveDate};
use core_types::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_RECENT_WINDOW_DAYS: u64 = 7;
pub const DEFAULT_LIMIT: usize = 6;

/// The record catalog. Declaration order is the presentation priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalBestKind {
    LargestWin,
    BestDay,
    BestRr,
    MostTradesInDay,
    LongestWinStreak,
    BestWeek,
    BestMonth,
    TopSymbol,
}

impl PersonalBestKind {
    pub const ALL: [PersonalBestKind; 8] = [
        PersonalBestKind::LargestWin,
        PersonalBestKind::BestDay,
        PersonalBestKind::BestRr,
        PersonalBestKind::MostTradesInDay,
        PersonalBestKind::LongestWinStreak,
        PersonalBestKind::BestWeek,
        PersonalBestKind::BestMonth,
        PersonalBestKind::TopSymbol,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PersonalBestKind::LargestWin => "Largest Win",
            PersonalBestKind::BestDay => "Best Day",
            PersonalBestKind::BestRr => "Best R-Multiple",
            PersonalBestKind::MostTradesInDay => "Most Trades in a Day",
            PersonalBestKind::LongestWinStreak => "Longest Win Streak",
            PersonalBestKind::BestWeek => "Best Week",
            PersonalBestKind::BestMonth => "Best Month",
            PersonalBestKind::TopSymbol => "Most Profitable Symbol",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalBest {
    pub kind: PersonalBestKind,
    pub title: String,
    pub value: Decimal,
    /// The date that set the record (the last contributing trade for multi-day records).
    pub date: NaiveDate,
    pub is_recent: bool,
    /// Extra context such as the symbol or the period label.
    pub detail: Option<String>,
}

/// Extracts superlative records from a (possibly pre-filtered) trade history.
#[derive(Debug, Clone, Copy)]
pub struct PersonalBestsExtractor {
    recent_window_days: u64,
    limit: usize,
}

impl Default for PersonalBestsExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_WINDOW_DAYS, DEFAULT_LIMIT)
    }
}

impl PersonalBestsExtractor {
    pub fn new(recent_window_days: u64, limit: usize) -> Self {
        Self {
            recent_window_days,
            limit,
        }
    }

    /// Returns at most `limit` records in catalog order. Kinds with no qualifying
    /// value (e.g. no winning trade yet) are skipped rather than reported as zero.
    pub fn extract(&self, trades: &[Trade], today: NaiveDate) -> Vec<PersonalBest> {
        let closed = closed_in_order(trades);
        let records: Vec<PersonalBest> = PersonalBestKind::ALL
            .iter()
            .filter_map(|kind| {
                let (value, date, detail) = find_record(*kind, trades, &closed)?;
                Some(PersonalBest {
                    kind: *kind,
                    title: kind.title().to_string(),
                    value,
                    date,
                    is_recent: self.is_recent(date, today),
                    detail,
                })
            })
            .take(self.limit)
            .collect();

        tracing::debug!(records = records.len(), %today, "Extracted personal bests");
        records
    }

    fn is_recent(&self, date: NaiveDate, today: NaiveDate) -> bool {
        if self.recent_window_days == 0 || date > today {
            return false;
        }
        match today.checked_sub_days(Days::new(self.recent_window_days)) {
            Some(cutoff) => date > cutoff,
            None => true,
        }
    }
}

type Record = (Decimal, NaiveDate, Option<String>);

fn find_record(kind: PersonalBestKind, trades: &[Trade], closed: &[&Trade]) -> Option<Record> {
    match kind {
        PersonalBestKind::LargestWin => max_by_value(closed.iter().map(|t| (t.pnl, t.date, Some(t.symbol.clone())))),
        PersonalBestKind::BestDay => max_by_value(closed_by_day(trades).into_iter().map(|(date, day)| (day.pnl, date, None))),
        PersonalBestKind::BestRr => max_by_value(
            closed
                .iter()
                .filter_map(|t| t.rr.map(|rr| (rr, t.date, Some(t.symbol.clone())))),
        ),
        PersonalBestKind::MostTradesInDay => {
            let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
            for trade in trades {
                *counts.entry(trade.date).or_default() += 1;
            }
            max_by_value(counts.into_iter().map(|(date, n)| (Decimal::from(n), date, None)))
        }
        PersonalBestKind::LongestWinStreak => {
            let runs = trade_runs(closed);
            let end = runs.longest_win_end?;
            Some((Decimal::from(runs.longest_win), end, None))
        }
        PersonalBestKind::BestWeek => best_period(closed, |date| {
            // The earliest representable weeks have no Monday; they start on the date itself.
            let monday = date
                .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
                .unwrap_or(date);
            (monday, format!("Week of {monday}"))
        }),
        PersonalBestKind::BestMonth => best_period(closed, |date| {
            let first = date.with_day(1).unwrap_or(date);
            (first, format!("{} {}", month_name(date.month()), date.year()))
        }),
        PersonalBestKind::TopSymbol => {
            let mut by_symbol: BTreeMap<&str, (Decimal, NaiveDate)> = BTreeMap::new();
            for trade in closed {
                let entry = by_symbol.entry(trade.symbol.as_str()).or_insert((Decimal::ZERO, trade.date));
                entry.0 += trade.pnl;
                entry.1 = entry.1.max(trade.date);
            }
            max_by_value(
                by_symbol
                    .into_iter()
                    .map(|(symbol, (pnl, date))| (pnl, date, Some(symbol.to_string()))),
            )
        }
    }
}

/// The strictly positive maximum; ties keep the first candidate.
fn max_by_value(candidates: impl Iterator<Item = Record>) -> Option<Record> {
    candidates
        .filter(|(value, _, _)| *value > Decimal::ZERO)
        .fold(None, |best: Option<Record>, candidate| match best {
            Some(current) if candidate.0 <= current.0 => Some(current),
            _ => Some(candidate),
        })
}

/// Sums closed P&L per period and returns the best one, dated by its last trade.
/// `period` maps a trade date to the period's first day and its label.
fn best_period(closed: &[&Trade], period: impl Fn(NaiveDate) -> (NaiveDate, String)) -> Option<Record> {
    // Walked in start order so ties resolve to the earlier period.
    let mut periods: BTreeMap<NaiveDate, (String, Decimal, NaiveDate)> = BTreeMap::new();
    for trade in closed {
        let (start, label) = period(trade.date);
        let entry = periods.entry(start).or_insert((label, Decimal::ZERO, trade.date));
        entry.1 += trade.pnl;
        entry.2 = entry.2.max(trade.date);
    }
    max_by_value(periods.into_values().map(|(label, pnl, date)| (pnl, date, Some(label))))
}

fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ];
    NAMES.get(month.saturating_sub(1) as usize).copied().unwrap_or("Unknown")
}
