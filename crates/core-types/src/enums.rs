use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Open,
    Closed,
}

/// Classification of a closed trade (or a day) by the sign of its P&L.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Breakeven,
}

impl Outcome {
    pub fn from_pnl(pnl: Decimal) -> Self {
        if pnl > Decimal::ZERO {
            Outcome::Win
        } else if pnl < Decimal::ZERO {
            Outcome::Loss
        } else {
            Outcome::Breakeven
        }
    }
}

/// Weekday key for per-day breakdowns.
///
/// `chrono::Weekday` has no total order, so breakdowns key on this enum instead,
/// ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self, DayOfWeek::Saturday | DayOfWeek::Sunday)
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

/// Decides whether two calendar dates count as consecutive for streak purposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum Continuity {
    /// Every calendar day counts; a weekend without activity breaks a streak.
    #[default]
    CalendarDays,
    /// Saturdays and Sundays between two dates are skipped over.
    BusinessDays,
}

impl Continuity {
    /// Returns true if `later` directly follows `earlier` under this policy.
    pub fn is_adjacent(&self, earlier: NaiveDate, later: NaiveDate) -> bool {
        if later <= earlier {
            return false;
        }
        match self {
            Continuity::CalendarDays => earlier.succ_opt() == Some(later),
            Continuity::BusinessDays => earlier
                .iter_days()
                .skip(1)
                .take_while(|day| *day < later)
                .all(|day| DayOfWeek::of(day).is_weekend()),
        }
    }
}

/// Length of a growth-comparison period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn outcome_follows_pnl_sign() {
        assert_eq!(Outcome::from_pnl(dec!(0.01)), Outcome::Win);
        assert_eq!(Outcome::from_pnl(dec!(-3)), Outcome::Loss);
        assert_eq!(Outcome::from_pnl(Decimal::ZERO), Outcome::Breakeven);
    }

    #[test]
    fn calendar_continuity_requires_next_day() {
        let friday = date(2024, 1, 5);
        assert!(Continuity::CalendarDays.is_adjacent(friday, date(2024, 1, 6)));
        assert!(!Continuity::CalendarDays.is_adjacent(friday, date(2024, 1, 8)));
        assert!(!Continuity::CalendarDays.is_adjacent(friday, friday));
    }

    #[test]
    fn business_continuity_skips_weekends_only() {
        let friday = date(2024, 1, 5);
        let monday = date(2024, 1, 8);
        assert!(Continuity::BusinessDays.is_adjacent(friday, monday));
        assert!(Continuity::BusinessDays.is_adjacent(friday, date(2024, 1, 6)));
        assert!(!Continuity::BusinessDays.is_adjacent(friday, date(2024, 1, 9)));
        assert!(!Continuity::BusinessDays.is_adjacent(date(2024, 1, 3), friday));
    }

    #[test]
    fn weekday_order_starts_on_monday() {
        assert!(DayOfWeek::Monday < DayOfWeek::Sunday);
        assert_eq!(DayOfWeek::of(date(2024, 1, 1)), DayOfWeek::Monday);
    }
}
