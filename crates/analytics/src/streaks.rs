use crate::daily::closed_by_day;
use chrono::NaiveDate;
use core_types::{Continuity, JournalEntry, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Current and best run for one streak family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub current: usize,
    pub best: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Days whose closed trades sum to a profit.
    pub winning_days: Streak,
    /// Days with at least one trade, open or closed.
    pub trading_days: Streak,
    /// Days with a journal entry.
    pub journal: Streak,
    /// Journaled days on which the system was followed.
    pub system_adherence: Streak,
    /// Current run of days whose closed trades sum to a loss.
    pub current_losing_streak: usize,
}

impl StreakSummary {
    /// True once the current losing run reaches `threshold` days. A zero threshold disables the warning.
    pub fn losing_streak_warning(&self, threshold: usize) -> bool {
        threshold > 0 && self.current_losing_streak >= threshold
    }
}

/// Computes day-based streaks relative to an explicit `today`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakTracker {
    continuity: Continuity,
}

impl StreakTracker {
    pub fn new(continuity: Continuity) -> Self {
        Self { continuity }
    }

    pub fn calculate(&self, trades: &[Trade], journal: &[JournalEntry], today: NaiveDate) -> StreakSummary {
        let days = closed_by_day(trades);
        let winning: BTreeSet<NaiveDate> = days
            .iter()
            .filter(|(_, day)| day.pnl > Decimal::ZERO)
            .map(|(date, _)| *date)
            .collect();
        let losing: BTreeSet<NaiveDate> = days
            .iter()
            .filter(|(_, day)| day.pnl < Decimal::ZERO)
            .map(|(date, _)| *date)
            .collect();
        let trading: BTreeSet<NaiveDate> = trades.iter().map(|t| t.date).collect();
        let journaled: BTreeSet<NaiveDate> = journal.iter().map(|e| e.date).collect();

        // A day with several entries only counts as adherent if none of them broke the system.
        let mut followed: BTreeMap<NaiveDate, bool> = BTreeMap::new();
        for entry in journal {
            *followed.entry(entry.date).or_insert(true) &= entry.followed_system;
        }
        let adherent: BTreeSet<NaiveDate> = followed
            .into_iter()
            .filter_map(|(date, ok)| ok.then_some(date))
            .collect();

        let summary = StreakSummary {
            winning_days: self.streak(&winning, today),
            trading_days: self.streak(&trading, today),
            journal: self.streak(&journaled, today),
            system_adherence: self.streak(&adherent, today),
            current_losing_streak: self.current_run(&losing, today),
        };
        tracing::debug!(?summary, %today, continuity = ?self.continuity, "Calculated streaks");
        summary
    }

    fn streak(&self, dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> Streak {
        Streak {
            current: self.current_run(dates, today),
            best: self.best_run(dates.range(..=today)),
        }
    }

    /// Walks back from `today`. The newest qualifying date may be today or the
    /// day adjacent before it, so an unfinished day does not reset the streak.
    fn current_run(&self, dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> usize {
        let mut previous = today;
        let mut run = 0;
        for &date in dates.range(..=today).rev() {
            let continues = if run == 0 {
                date == today || self.continuity.is_adjacent(date, today)
            } else {
                self.continuity.is_adjacent(date, previous)
            };
            if !continues {
                break;
            }
            run += 1;
            previous = date;
        }
        run
    }

    fn best_run<'a>(&self, dates: impl IntoIterator<Item = &'a NaiveDate>) -> usize {
        let mut best = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;
        for &date in dates {
            run = match previous {
                Some(prev) if self.continuity.is_adjacent(prev, date) => run + 1,
                _ => 1,
            };
            best = best.max(run);
            previous = Some(date);
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn win(d: NaiveDate) -> Trade {
        Trade::closed(d, "ES", dec!(10))
    }

    fn loss(d: NaiveDate) -> Trade {
        Trade::closed(d, "ES", dec!(-10))
    }

    #[test]
    fn trailing_consecutive_winning_days_form_current_streak() {
        let trades: Vec<Trade> = (1..=5).map(|d| win(date(2024, 3, d))).collect();
        let summary = StreakTracker::default().calculate(&trades, &[], date(2024, 3, 5));
        assert_eq!(summary.winning_days, Streak { current: 5, best: 5 });
        assert_eq!(summary.trading_days.current, 5);
    }

    #[test]
    fn gap_terminates_current_but_not_best() {
        let mut trades: Vec<Trade> = (1..=4).map(|d| win(date(2024, 3, d))).collect();
        trades.push(win(date(2024, 3, 7)));
        trades.push(win(date(2024, 3, 8)));
        let summary = StreakTracker::default().calculate(&trades, &[], date(2024, 3, 8));
        assert_eq!(summary.winning_days, Streak { current: 2, best: 4 });
    }

    #[test]
    fn streak_survives_until_today_is_over_but_not_longer() {
        let trades = vec![win(date(2024, 3, 1)), win(date(2024, 3, 2))];
        let tracker = StreakTracker::default();
        assert_eq!(tracker.calculate(&trades, &[], date(2024, 3, 3)).winning_days.current, 2);
        assert_eq!(tracker.calculate(&trades, &[], date(2024, 3, 4)).winning_days.current, 0);
    }

    #[test]
    fn dates_after_today_are_ignored() {
        let trades = vec![win(date(2024, 3, 1)), win(date(2024, 3, 2)), win(date(2024, 3, 10))];
        let summary = StreakTracker::default().calculate(&trades, &[], date(2024, 3, 2));
        assert_eq!(summary.winning_days.current, 2);
    }

    #[test]
    fn losing_day_breaks_winning_streak_and_feeds_losing_streak() {
        let trades = vec![
            win(date(2024, 3, 1)),
            loss(date(2024, 3, 2)),
            loss(date(2024, 3, 3)),
            // Mixed day netting negative.
            win(date(2024, 3, 4)),
            loss(date(2024, 3, 4)),
            loss(date(2024, 3, 4)),
        ];
        let summary = StreakTracker::default().calculate(&trades, &[], date(2024, 3, 4));
        assert_eq!(summary.winning_days.current, 0);
        assert_eq!(summary.current_losing_streak, 3);
        assert_eq!(summary.trading_days.current, 4);
        assert!(summary.losing_streak_warning(3));
        assert!(!summary.losing_streak_warning(4));
        assert!(!summary.losing_streak_warning(0));
    }

    #[test]
    fn weekend_breaks_calendar_streak_but_not_business_streak() {
        // Thu 2024-01-04, Fri 01-05, Mon 01-08.
        let trades = vec![win(date(2024, 1, 4)), win(date(2024, 1, 5)), win(date(2024, 1, 8))];
        let today = date(2024, 1, 8);

        let calendar = StreakTracker::new(Continuity::CalendarDays).calculate(&trades, &[], today);
        assert_eq!(calendar.winning_days, Streak { current: 1, best: 2 });
        assert_eq!(calendar.trading_days, Streak { current: 1, best: 2 });

        let business = StreakTracker::new(Continuity::BusinessDays).calculate(&trades, &[], today);
        assert_eq!(business.winning_days, Streak { current: 3, best: 3 });
        assert_eq!(business.trading_days, Streak { current: 3, best: 3 });
    }

    #[test]
    fn business_streak_still_breaks_on_a_missed_weekday() {
        // Fri 01-05 then Tue 01-09: Monday was skipped.
        let trades = vec![win(date(2024, 1, 5)), win(date(2024, 1, 9))];
        let summary = StreakTracker::new(Continuity::BusinessDays).calculate(&trades, &[], date(2024, 1, 9));
        assert_eq!(summary.winning_days, Streak { current: 1, best: 1 });
    }

    #[test]
    fn journal_and_adherence_streaks_track_entries() {
        let journal = vec![
            JournalEntry::new(date(2024, 2, 1), true),
            JournalEntry::new(date(2024, 2, 2), false),
            JournalEntry::new(date(2024, 2, 3), true),
            JournalEntry::new(date(2024, 2, 4), true),
            // A second entry breaking the system spoils the day.
            JournalEntry::new(date(2024, 2, 4), false),
        ];
        let summary = StreakTracker::default().calculate(&[], &journal, date(2024, 2, 4));
        assert_eq!(summary.journal, Streak { current: 4, best: 4 });
        // Feb 3 still counts as "yesterday" for the current run.
        assert_eq!(summary.system_adherence, Streak { current: 1, best: 1 });
    }
}
