use crate::daily::{closed_by_day, closed_in_order};
use crate::report::{DailyPnl, GroupStats, Statistics};
use chrono::NaiveDate;
use core_types::{DayOfWeek, Outcome, Trade};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// A stateless calculator for deriving performance metrics from a trade history.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating performance metrics.
    ///
    /// # Arguments
    ///
    /// * `trades` - Every trade in scope, in any order. Open trades are only counted.
    ///
    /// # Returns
    ///
    /// A fully populated `Statistics`. This never fails: every ratio falls back to
    /// zero (or the profit-factor infinity sentinel) when its denominator is empty.
    pub fn calculate(&self, trades: &[Trade]) -> Statistics {
        let mut report = Statistics::new();
        report.open_trades = trades.iter().filter(|t| !t.is_closed()).count();

        let closed = closed_in_order(trades);
        if closed.is_empty() {
            return report;
        }

        self.calculate_profitability(&closed, &mut report);
        self.calculate_days(trades, &mut report);
        self.calculate_runs(&closed, &mut report);
        self.calculate_breakdowns(&closed, &mut report);

        tracing::debug!(
            total_trades = report.total_trades,
            open_trades = report.open_trades,
            total_pnl = %report.total_pnl,
            "Calculated trade statistics"
        );
        report
    }

    /// Calculates counts, P&L aggregates, averages and ratios.
    fn calculate_profitability(&self, closed: &[&Trade], report: &mut Statistics) {
        report.total_trades = closed.len();

        for trade in closed {
            report.total_pnl += trade.pnl;
            if let Some(rr) = trade.rr {
                report.total_rr += rr;
                report.rr_trades += 1;
            }

            match trade.outcome() {
                Outcome::Win => {
                    report.winning_trades += 1;
                    report.gross_profit += trade.pnl;
                    report.largest_win = report.largest_win.max(trade.pnl);
                }
                Outcome::Loss => {
                    report.losing_trades += 1;
                    report.gross_loss += trade.pnl.abs();
                    report.largest_loss = report.largest_loss.min(trade.pnl);
                }
                Outcome::Breakeven => report.breakeven_trades += 1,
            }
        }

        // --- Ratios ---
        report.win_rate = win_rate(report.winning_trades, report.losing_trades);
        report.profit_factor = profit_factor(report.gross_profit, report.gross_loss);

        if report.winning_trades > 0 {
            report.avg_win = report.gross_profit / Decimal::from(report.winning_trades);
        }
        if report.losing_trades > 0 {
            report.avg_loss = -report.gross_loss / Decimal::from(report.losing_trades);
        }
        report.expectancy = report.total_pnl / Decimal::from(report.total_trades);
        if report.rr_trades > 0 {
            report.expectancy_rr = report.total_rr / Decimal::from(report.rr_trades);
        }
    }

    /// Finds the best and worst day by summed daily P&L.
    fn calculate_days(&self, trades: &[Trade], report: &mut Statistics) {
        let days = closed_by_day(trades);
        // Ties keep the earliest date.
        for (date, day) in &days {
            let candidate = DailyPnl { date: *date, pnl: day.pnl };
            if report.best_day.is_none_or(|best| day.pnl > best.pnl) {
                report.best_day = Some(candidate);
            }
            if report.worst_day.is_none_or(|worst| day.pnl < worst.pnl) {
                report.worst_day = Some(candidate);
            }
        }
    }

    /// Calculates the signed current run and the longest runs of each sign.
    fn calculate_runs(&self, closed: &[&Trade], report: &mut Statistics) {
        let runs = trade_runs(closed);
        report.current_streak = runs.current;
        report.longest_win_streak = runs.longest_win;
        report.longest_lose_streak = runs.longest_loss;
    }

    /// Groups trades by weekday, setup and symbol.
    fn calculate_breakdowns(&self, closed: &[&Trade], report: &mut Statistics) {
        for trade in closed {
            report
                .performance_by_day
                .entry(DayOfWeek::of(trade.date))
                .or_default()
                .record(trade);
            // Trades without a setup are not grouped; they still count in the totals.
            if let Some(setup) = trade.setup {
                report.performance_by_setup.entry(setup).or_default().record(trade);
            }
            report
                .performance_by_symbol
                .entry(trade.symbol.clone())
                .or_default()
                .record(trade);
        }

        let groups = report
            .performance_by_day
            .values_mut()
            .chain(report.performance_by_setup.values_mut())
            .chain(report.performance_by_symbol.values_mut());
        for group in groups {
            group.win_rate = win_rate(group.wins, group.losses);
        }
    }
}

impl GroupStats {
    fn record(&mut self, trade: &Trade) {
        self.trades += 1;
        self.pnl += trade.pnl;
        self.rr += trade.rr.unwrap_or(Decimal::ZERO);
        match trade.outcome() {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Breakeven => {}
        }
    }
}

/// Same-sign runs over a chronologically ordered trade list.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct TradeRuns {
    pub current: i64,
    pub longest_win: usize,
    /// Date of the trade that closed the longest winning run.
    pub longest_win_end: Option<NaiveDate>,
    pub longest_loss: usize,
}

pub(crate) fn trade_runs(closed: &[&Trade]) -> TradeRuns {
    let mut runs = TradeRuns::default();
    let mut current: i64 = 0;

    for trade in closed {
        current = match trade.outcome() {
            Outcome::Win if current > 0 => current + 1,
            Outcome::Win => 1,
            Outcome::Loss if current < 0 => current - 1,
            Outcome::Loss => -1,
            Outcome::Breakeven => 0,
        };
        let length = current.unsigned_abs() as usize;
        if current > 0 && length > runs.longest_win {
            runs.longest_win = length;
            runs.longest_win_end = Some(trade.date);
        } else if current < 0 && length > runs.longest_loss {
            runs.longest_loss = length;
        }
    }

    runs.current = current;
    runs
}

/// wins / (wins + losses) as a percentage; breakevens are not part of the denominator.
pub(crate) fn win_rate(wins: usize, losses: usize) -> f64 {
    let decided = wins + losses;
    if decided == 0 {
        0.0
    } else {
        wins as f64 / decided as f64 * 100.0
    }
}

/// Gross profit over absolute gross loss, with an infinity sentinel for loss-free histories.
pub(crate) fn profit_factor(gross_profit: Decimal, gross_loss: Decimal) -> f64 {
    if gross_loss > Decimal::ZERO {
        to_f64(gross_profit) / to_f64(gross_loss)
    } else if gross_profit > Decimal::ZERO {
        f64::INFINITY
    } else {
        0.0
    }
}

pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::TradeStatus;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trade(day: u32, pnl: Decimal) -> Trade {
        Trade::closed(date(2024, 1, day), "ES", pnl)
    }

    #[test]
    fn worked_example_matches_expected_figures() {
        let trades = vec![trade(1, dec!(100)), trade(2, dec!(-50)), trade(3, dec!(75))];
        let stats = AnalyticsEngine::new().calculate(&trades);

        assert_eq!(stats.total_trades, 3);
        assert_eq!(stats.winning_trades, 2);
        assert_eq!(stats.losing_trades, 1);
        assert!((stats.win_rate - 66.666_666).abs() < 1e-3);
        assert_eq!(stats.total_pnl, dec!(125));
        assert_eq!(stats.avg_win, dec!(87.5));
        assert_eq!(stats.avg_loss, dec!(-50));
        assert!((stats.profit_factor - 3.5).abs() < 1e-9);
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn empty_history_is_all_zero() {
        let stats = AnalyticsEngine::new().calculate(&[]);
        assert_eq!(stats.win_rate, 0.0);
        assert_eq!(stats.profit_factor, 0.0);
        assert_eq!(stats.total_pnl, Decimal::ZERO);
        assert_eq!(stats.expectancy, Decimal::ZERO);
        assert!(stats.best_day.is_none());
    }

    #[test]
    fn loss_free_history_uses_infinity_sentinel() {
        let stats = AnalyticsEngine::new().calculate(&[trade(1, dec!(10)), trade(2, dec!(0))]);
        assert!(stats.profit_factor.is_infinite());
        assert_eq!(stats.breakeven_trades, 1);
        assert_eq!(stats.win_rate, 100.0);

        let flat = AnalyticsEngine::new().calculate(&[trade(1, dec!(0))]);
        assert_eq!(flat.profit_factor, 0.0);
        assert!(!flat.profit_factor.is_nan());
    }

    #[test]
    fn counts_partition_closed_trades_and_skip_open_ones() {
        let mut open = trade(4, dec!(999));
        open.status = TradeStatus::Open;
        let trades = vec![trade(1, dec!(5)), trade(2, dec!(-5)), trade(3, dec!(0)), open];
        let stats = AnalyticsEngine::new().calculate(&trades);

        assert_eq!(stats.open_trades, 1);
        assert_eq!(
            stats.winning_trades + stats.losing_trades + stats.breakeven_trades,
            stats.total_trades
        );
        assert_eq!(stats.total_pnl, Decimal::ZERO);
    }

    #[test]
    fn best_and_worst_day_collapse_same_day_trades() {
        // Two trades on the 1st net to 30; the single 60 on the 2nd is the best day
        // even though the 1st holds the largest single trade.
        let trades = vec![trade(1, dec!(80)), trade(1, dec!(-50)), trade(2, dec!(60)), trade(3, dec!(-20))];
        let stats = AnalyticsEngine::new().calculate(&trades);

        assert_eq!(stats.best_day, Some(DailyPnl { date: date(2024, 1, 2), pnl: dec!(60) }));
        assert_eq!(stats.worst_day, Some(DailyPnl { date: date(2024, 1, 3), pnl: dec!(-20) }));
        assert_eq!(stats.largest_win, dec!(80));
    }

    #[test]
    fn rr_averages_skip_trades_without_rr() {
        let mut with_rr = trade(1, dec!(100));
        with_rr.rr = Some(dec!(2));
        let mut zero_rr = trade(2, dec!(-10));
        zero_rr.rr = Some(Decimal::ZERO);
        let without_rr = trade(3, dec!(50));

        let stats = AnalyticsEngine::new().calculate(&[with_rr, zero_rr, without_rr]);
        assert_eq!(stats.total_rr, dec!(2));
        assert_eq!(stats.rr_trades, 2);
        assert_eq!(stats.expectancy_rr, dec!(1));
    }

    #[test]
    fn runs_follow_chronological_order() {
        // Logged out of order; the engine sorts by date before counting runs.
        let trades = vec![
            trade(5, dec!(-1)),
            trade(1, dec!(1)),
            trade(2, dec!(1)),
            trade(3, dec!(1)),
            trade(4, dec!(-1)),
        ];
        let stats = AnalyticsEngine::new().calculate(&trades);
        assert_eq!(stats.longest_win_streak, 3);
        assert_eq!(stats.longest_lose_streak, 2);
        assert_eq!(stats.current_streak, -2);
    }

    #[test]
    fn breakdowns_group_by_weekday_setup_and_symbol() {
        let setup = Uuid::new_v4();
        // 2024-01-01 is a Monday.
        let mut a = trade(1, dec!(10));
        a.setup = Some(setup);
        let mut b = trade(8, dec!(-4));
        b.setup = Some(setup);
        b.symbol = "NQ".to_string();
        let c = trade(2, dec!(3));

        let stats = AnalyticsEngine::new().calculate(&[a, b, c]);
        let monday = &stats.performance_by_day[&DayOfWeek::Monday];
        assert_eq!(monday.trades, 2);
        assert_eq!(monday.pnl, dec!(6));
        assert_eq!(monday.win_rate, 50.0);

        assert_eq!(stats.performance_by_setup.len(), 1);
        assert_eq!(stats.performance_by_setup[&setup].trades, 2);
        assert_eq!(stats.performance_by_symbol["ES"].wins, 2);
        assert_eq!(stats.performance_by_symbol["NQ"].losses, 1);
    }
}
