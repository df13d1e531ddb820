use chrono::NaiveDate;
use core_types::DayOfWeek;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Summed P&L of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPnl {
    pub date: NaiveDate,
    pub pnl: Decimal,
}

/// Aggregate for one key of a breakdown (a weekday, a setup or a symbol).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub pnl: Decimal,
    pub rr: Decimal,
    pub win_rate: f64,
}

/// A comprehensive report of a trade collection's performance.
///
/// This struct is the output of the `AnalyticsEngine` and the input to the
/// achievement, personal-best and growth calculations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    // I. Counts
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub breakeven_trades: usize,
    /// Open trades are reported but excluded from every other figure.
    pub open_trades: usize,
    pub win_rate: f64,

    // II. Profitability
    pub total_pnl: Decimal,
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    pub avg_win: Decimal,
    /// Signed, so zero or negative.
    pub avg_loss: Decimal,
    /// `f64::INFINITY` when there are wins and no losses.
    pub profit_factor: f64,
    pub expectancy: Decimal,
    pub largest_win: Decimal,
    pub largest_loss: Decimal,

    // III. R-multiples
    pub total_rr: Decimal,
    /// Number of closed trades that carry an R-multiple.
    pub rr_trades: usize,
    pub expectancy_rr: Decimal,

    // IV. Days and runs
    pub best_day: Option<DailyPnl>,
    pub worst_day: Option<DailyPnl>,
    /// Positive for a winning run, negative for a losing run.
    pub current_streak: i64,
    pub longest_win_streak: usize,
    pub longest_lose_streak: usize,

    // V. Breakdowns
    pub performance_by_day: BTreeMap<DayOfWeek, GroupStats>,
    pub performance_by_setup: BTreeMap<Uuid, GroupStats>,
    pub performance_by_symbol: BTreeMap<String, GroupStats>,
}

impl Statistics {
    /// Creates a new, zeroed-out report.
    pub fn new() -> Self {
        Self {
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            breakeven_trades: 0,
            open_trades: 0,
            win_rate: 0.0,
            total_pnl: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            gross_loss: Decimal::ZERO,
            avg_win: Decimal::ZERO,
            avg_loss: Decimal::ZERO,
            profit_factor: 0.0,
            expectancy: Decimal::ZERO,
            largest_win: Decimal::ZERO,
            largest_loss: Decimal::ZERO,
            total_rr: Decimal::ZERO,
            rr_trades: 0,
            expectancy_rr: Decimal::ZERO,
            best_day: None,
            worst_day: None,
            current_streak: 0,
            longest_win_streak: 0,
            longest_lose_streak: 0,
            performance_by_day: BTreeMap::new(),
            performance_by_setup: BTreeMap::new(),
            performance_by_symbol: BTreeMap::new(),
        }
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}
