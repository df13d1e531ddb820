use crate::engine::{AnalyticsEngine, to_f64};
use crate::error::AnalyticsError;
use crate::report::Statistics;
use chrono::{Datelike, Days, NaiveDate};
use core_types::{PeriodKind, Trade};
use serde::{Deserialize, Serialize};

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// The calendar week (Monday to Sunday), month, quarter or year containing `date`.
    pub fn containing(date: NaiveDate, kind: PeriodKind) -> Result<Self, AnalyticsError> {
        let out_of_range = || AnalyticsError::DateOutOfRange(date);
        let (start, end) = match kind {
            PeriodKind::Week => {
                let start = date
                    .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
                    .ok_or_else(out_of_range)?;
                (start, start.checked_add_days(Days::new(6)).ok_or_else(out_of_range)?)
            }
            PeriodKind::Month => month_span(date.year(), date.month(), 1).ok_or_else(out_of_range)?,
            PeriodKind::Quarter => {
                let first_month = (date.month0() / 3) * 3 + 1;
                month_span(date.year(), first_month, 3).ok_or_else(out_of_range)?
            }
            PeriodKind::Year => month_span(date.year(), 1, 12).ok_or_else(out_of_range)?,
        };
        Ok(Self { start, end })
    }

    /// The calendar period of the same kind that ends the day before this one starts.
    pub fn preceding(&self, kind: PeriodKind) -> Result<Self, AnalyticsError> {
        let day_before = self
            .start
            .pred_opt()
            .ok_or(AnalyticsError::DateOutOfRange(self.start))?;
        Self::containing(day_before, kind)
    }

    /// The period of identical length that ends the day before this one starts.
    pub fn previous(&self) -> Result<Self, AnalyticsError> {
        let length = Days::new(self.days());
        let out_of_range = || AnalyticsError::DateOutOfRange(self.start);
        let end = self.start.pred_opt().ok_or_else(out_of_range)?;
        let start = self.start.checked_sub_days(length).ok_or_else(out_of_range)?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the period, both ends included.
    pub fn days(&self) -> u64 {
        (self.end - self.start).num_days().unsigned_abs() + 1
    }
}

/// First day of `month` through the last day of the month `span - 1` months later.
fn month_span(year: i32, month: u32, span: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let months_after = month - 1 + span;
    let next = NaiveDate::from_ymd_opt(year + (months_after / 12) as i32, months_after % 12 + 1, 1)?;
    Some((start, next.pred_opt()?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthMetric {
    TotalPnl,
    WinRate,
    TotalTrades,
    WinningTrades,
    LosingTrades,
    ProfitFactor,
    AvgWin,
    AvgLoss,
    Expectancy,
    TotalRr,
}

/// Which direction of change counts as an improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

impl GrowthMetric {
    pub const ALL: [GrowthMetric; 10] = [
        GrowthMetric::TotalPnl,
        GrowthMetric::WinRate,
        GrowthMetric::TotalTrades,
        GrowthMetric::WinningTrades,
        GrowthMetric::LosingTrades,
        GrowthMetric::ProfitFactor,
        GrowthMetric::AvgWin,
        GrowthMetric::AvgLoss,
        GrowthMetric::Expectancy,
        GrowthMetric::TotalRr,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GrowthMetric::TotalPnl => "Total P&L",
            GrowthMetric::WinRate => "Win Rate",
            GrowthMetric::TotalTrades => "Total Trades",
            GrowthMetric::WinningTrades => "Winning Trades",
            GrowthMetric::LosingTrades => "Losing Trades",
            GrowthMetric::ProfitFactor => "Profit Factor",
            GrowthMetric::AvgWin => "Average Win",
            GrowthMetric::AvgLoss => "Average Loss",
            GrowthMetric::Expectancy => "Expectancy",
            GrowthMetric::TotalRr => "Total R",
        }
    }

    /// Polarity table. Average loss is signed, so a rise towards zero is an improvement.
    pub fn polarity(&self) -> Polarity {
        match self {
            GrowthMetric::LosingTrades => Polarity::LowerIsBetter,
            _ => Polarity::HigherIsBetter,
        }
    }

    fn value(&self, stats: &Statistics) -> f64 {
        match self {
            GrowthMetric::TotalPnl => to_f64(stats.total_pnl),
            GrowthMetric::WinRate => stats.win_rate,
            GrowthMetric::TotalTrades => stats.total_trades as f64,
            GrowthMetric::WinningTrades => stats.winning_trades as f64,
            GrowthMetric::LosingTrades => stats.losing_trades as f64,
            GrowthMetric::ProfitFactor => stats.profit_factor,
            GrowthMetric::AvgWin => to_f64(stats.avg_win),
            GrowthMetric::AvgLoss => to_f64(stats.avg_loss),
            GrowthMetric::Expectancy => to_f64(stats.expectancy),
            GrowthMetric::TotalRr => to_f64(stats.total_rr),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    pub metric: GrowthMetric,
    pub label: String,
    pub current: f64,
    pub previous: f64,
    pub change_percent: f64,
    pub trend: Trend,
    pub is_positive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthReport {
    pub current_period: Period,
    pub previous_period: Period,
    pub metrics: Vec<MetricComparison>,
}

/// Compares statistics of two periods metric by metric.
#[derive(Debug, Default)]
pub struct GrowthComparator {
    engine: AnalyticsEngine,
}

impl GrowthComparator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares the calendar period of `kind` containing `today` against the one before it.
    pub fn compare_calendar(
        &self,
        trades: &[Trade],
        today: NaiveDate,
        kind: PeriodKind,
    ) -> Result<GrowthReport, AnalyticsError> {
        let current = Period::containing(today, kind)?;
        let previous = current.preceding(kind)?;
        Ok(self.compare(trades, current, previous))
    }

    pub fn compare(&self, trades: &[Trade], current: Period, previous: Period) -> GrowthReport {
        let current_stats = self.stats_for(trades, &current);
        let previous_stats = self.stats_for(trades, &previous);

        let metrics = GrowthMetric::ALL
            .iter()
            .map(|metric| {
                let now = metric.value(&current_stats);
                let before = metric.value(&previous_stats);
                let trend = trend(now, before);
                MetricComparison {
                    metric: *metric,
                    label: metric.label().to_string(),
                    current: now,
                    previous: before,
                    change_percent: change_percent(now, before),
                    trend,
                    is_positive: is_positive(trend, metric.polarity()),
                }
            })
            .collect();

        tracing::debug!(
            current_start = %current.start,
            previous_start = %previous.start,
            "Compared growth periods"
        );
        GrowthReport {
            current_period: current,
            previous_period: previous,
            metrics,
        }
    }

    fn stats_for(&self, trades: &[Trade], period: &Period) -> Statistics {
        let in_period: Vec<Trade> = trades
            .iter()
            .filter(|t| period.contains(t.date))
            .cloned()
            .collect();
        self.engine.calculate(&in_period)
    }
}

/// Relative change in percent. Never NaN: equal values give 0, a zero or infinite
/// baseline gives a signed infinity or a full decline.
pub fn change_percent(current: f64, previous: f64) -> f64 {
    if current == previous {
        0.0
    } else if previous == 0.0 {
        if current > 0.0 { f64::INFINITY } else { f64::NEG_INFINITY }
    } else if previous.is_infinite() {
        -100.0 * previous.signum()
    } else if current.is_infinite() {
        current
    } else {
        (current - previous) / previous.abs() * 100.0
    }
}

fn trend(current: f64, previous: f64) -> Trend {
    if current > previous {
        Trend::Up
    } else if current < previous {
        Trend::Down
    } else {
        Trend::Neutral
    }
}

fn is_positive(trend: Trend, polarity: Polarity) -> bool {
    matches!(
        (trend, polarity),
        (Trend::Up, Polarity::HigherIsBetter) | (Trend::Down, Polarity::LowerIsBetter)
    )
}
