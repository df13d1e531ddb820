use crate::engine::to_f64;
use crate::error::AnalyticsError;
use crate::report::Statistics;
use crate::streaks::StreakSummary;
use core_types::{JournalEntry, Trade};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Win-rate and profit-factor achievements only count once the sample is this large.
const MIN_SAMPLE_TRADES: usize = 20;

/// Everything an achievement metric may read.
#[derive(Debug, Clone, Copy)]
pub struct AchievementContext<'a> {
    pub trades: &'a [Trade],
    pub stats: &'a Statistics,
    pub journal: &'a [JournalEntry],
    pub streaks: &'a StreakSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Milestones,
    Profitability,
    Consistency,
    Discipline,
    Exploration,
}

/// How a metric value is rendered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueFormat {
    Count,
    Currency,
    Percent,
    Ratio,
    Days,
}

impl ValueFormat {
    pub fn format(&self, value: f64) -> String {
        if value.is_infinite() {
            return "∞".to_string();
        }
        match self {
            ValueFormat::Count => format!("{}", value.floor() as i64),
            ValueFormat::Currency if value < 0.0 => format!("-${:.2}", value.abs()),
            ValueFormat::Currency => format!("${value:.2}"),
            ValueFormat::Percent => format!("{value:.1}%"),
            ValueFormat::Ratio => format!("{value:.2}"),
            ValueFormat::Days if value == 1.0 => "1 day".to_string(),
            ValueFormat::Days => format!("{} days", value.floor() as i64),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub metric: fn(&AchievementContext<'_>) -> f64,
    pub target: f64,
    pub format: ValueFormat,
}

/// The evaluated state of one achievement. Recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementProgress {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: AchievementCategory,
    pub current: f64,
    pub target: f64,
    /// Percentage towards the target, clamped to 0..=100.
    pub progress: f64,
    pub is_unlocked: bool,
    pub formatted_current: String,
    pub formatted_target: String,
}

/// Evaluates a fixed achievement catalog against derived statistics.
#[derive(Debug, Clone)]
pub struct AchievementEvaluator {
    definitions: Vec<AchievementDefinition>,
}

impl Default for AchievementEvaluator {
    fn default() -> Self {
        Self {
            definitions: default_catalog(),
        }
    }
}

impl AchievementEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an evaluator over a custom catalog, rejecting non-positive targets and duplicate ids.
    pub fn with_definitions(definitions: Vec<AchievementDefinition>) -> Result<Self, AnalyticsError> {
        let mut seen = HashSet::new();
        for definition in &definitions {
            if !(definition.target > 0.0) || !definition.target.is_finite() {
                return Err(AnalyticsError::InvalidTarget(definition.id.to_string()));
            }
            if !seen.insert(definition.id) {
                return Err(AnalyticsError::DuplicateAchievement(definition.id.to_string()));
            }
        }
        Ok(Self { definitions })
    }

    /// Evaluates every definition, in catalog order.
    pub fn evaluate(&self, context: &AchievementContext<'_>) -> Vec<AchievementProgress> {
        let results: Vec<AchievementProgress> = self
            .definitions
            .iter()
            .map(|definition| {
                let current = (definition.metric)(context);
                let current = if current.is_nan() { 0.0 } else { current };
                AchievementProgress {
                    id: definition.id.to_string(),
                    title: definition.title.to_string(),
                    description: definition.description.to_string(),
                    category: definition.category,
                    current,
                    target: definition.target,
                    progress: progress(current, definition.target),
                    is_unlocked: current >= definition.target,
                    formatted_current: definition.format.format(current),
                    formatted_target: definition.format.format(definition.target),
                }
            })
            .collect();

        tracing::debug!(
            evaluated = results.len(),
            unlocked = results.iter().filter(|a| a.is_unlocked).count(),
            "Evaluated achievements"
        );
        results
    }
}

/// `current / target` as a percentage in `0..=100`.
pub fn progress(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 100.0;
    }
    let pct = current / target * 100.0;
    if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 100.0) }
}

/// Display order: unlocked achievements first (in catalog order), then locked ones
/// by descending progress.
pub fn sort_for_display(achievements: &mut [AchievementProgress]) {
    achievements.sort_by(|a, b| match (a.is_unlocked, b.is_unlocked) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => Ordering::Equal,
        (false, false) => b.progress.total_cmp(&a.progress),
    });
}

fn sampled(stats: &Statistics, value: f64) -> f64 {
    if stats.total_trades >= MIN_SAMPLE_TRADES { value } else { 0.0 }
}

fn distinct_symbols(trades: &[Trade]) -> f64 {
    trades
        .iter()
        .map(|t| t.symbol.to_uppercase())
        .collect::<HashSet<_>>()
        .len() as f64
}

fn distinct_setups(trades: &[Trade]) -> f64 {
    trades.iter().filter_map(|t| t.setup).collect::<HashSet<_>>().len() as f64
}

fn journaled_days(journal: &[JournalEntry]) -> f64 {
    journal.iter().map(|e| e.date).collect::<HashSet<_>>().len() as f64
}

/// The built-in achievement catalog.
pub fn default_catalog() -> Vec<AchievementDefinition> {
    use AchievementCategory::*;

    vec![
        AchievementDefinition {
            id: "first_trade",
            title: "First Steps",
            description: "Log your first closed trade",
            category: Milestones,
            metric: |c| c.stats.total_trades as f64,
            target: 1.0,
            format: ValueFormat::Count,
        },
        AchievementDefinition {
            id: "trades_100",
            title: "Centurion",
            description: "Close 100 trades",
            category: Milestones,
            metric: |c| c.stats.total_trades as f64,
            target: 100.0,
            format: ValueFormat::Count,
        },
        AchievementDefinition {
            id: "trades_500",
            title: "Veteran",
            description: "Close 500 trades",
            category: Milestones,
            metric: |c| c.stats.total_trades as f64,
            target: 500.0,
            format: ValueFormat::Count,
        },
        AchievementDefinition {
            id: "first_win",
            title: "In the Green",
            description: "Close your first winning trade",
            category: Milestones,
            metric: |c| c.stats.winning_trades as f64,
            target: 1.0,
            format: ValueFormat::Count,
        },
        AchievementDefinition {
            id: "wins_50",
            title: "Half Century",
            description: "Close 50 winning trades",
            category: Milestones,
            metric: |c| c.stats.winning_trades as f64,
            target: 50.0,
            format: ValueFormat::Count,
        },
        AchievementDefinition {
            id: "profit_1k",
            title: "Four Figures",
            description: "Reach $1,000 in total profit",
            category: Profitability,
            metric: |c| to_f64(c.stats.total_pnl),
            target: 1_000.0,
            format: ValueFormat::Currency,
        },
        AchievementDefinition {
            id: "profit_10k",
            title: "Five Figures",
            description: "Reach $10,000 in total profit",
            category: Profitability,
            metric: |c| to_f64(c.stats.total_pnl),
            target: 10_000.0,
            format: ValueFormat::Currency,
        },
        AchievementDefinition {
            id: "big_day",
            title: "Big Day",
            description: "Make $500 in a single day",
            category: Profitability,
            metric: |c| c.stats.best_day.map(|d| to_f64(d.pnl)).unwrap_or(0.0),
            target: 500.0,
            format: ValueFormat::Currency,
        },
        AchievementDefinition {
            id: "sharp_shooter",
            title: "Sharp Shooter",
            description: "Hold a 60% win rate over at least 20 trades",
            category: Profitability,
            metric: |c| sampled(c.stats, c.stats.win_rate),
            target: 60.0,
            format: ValueFormat::Percent,
        },
        AchievementDefinition {
            id: "edge_finder",
            title: "Edge Finder",
            description: "Hold a profit factor of 2 over at least 20 trades",
            category: Profitability,
            metric: |c| sampled(c.stats, c.stats.profit_factor),
            target: 2.0,
            format: ValueFormat::Ratio,
        },
        AchievementDefinition {
            id: "hot_hand",
            title: "Hot Hand",
            description: "Win 5 trades in a row",
            category: Consistency,
            metric: |c| c.stats.longest_win_streak as f64,
            target: 5.0,
            format: ValueFormat::Count,
        },
        AchievementDefinition {
            id: "green_week",
            title: "Green Week",
            description: "Finish 5 consecutive days in profit",
            category: Consistency,
            metric: |c| c.streaks.winning_days.best as f64,
            target: 5.0,
            format: ValueFormat::Days,
        },
        AchievementDefinition {
            id: "reflective",
            title: "Reflective Trader",
            description: "Write journal entries on 30 different days",
            category: Discipline,
            metric: |c| journaled_days(c.journal),
            target: 30.0,
            format: ValueFormat::Days,
        },
        AchievementDefinition {
            id: "journal_streak",
            title: "Daily Ritual",
            description: "Journal 7 days in a row",
            category: Discipline,
            metric: |c| c.streaks.journal.best as f64,
            target: 7.0,
            format: ValueFormat::Days,
        },
        AchievementDefinition {
            id: "disciplined",
            title: "By the Book",
            description: "Follow your system 10 days in a row",
            category: Discipline,
            metric: |c| c.streaks.system_adherence.best as f64,
            target: 10.0,
            format: ValueFormat::Days,
        },
        AchievementDefinition {
            id: "diversified",
            title: "Explorer",
            description: "Trade 10 different symbols",
            category: Exploration,
            metric: |c| distinct_symbols(c.trades),
            target: 10.0,
            format: ValueFormat::Count,
        },
        AchievementDefinition {
            id: "playbook",
            title: "Playbook",
            description: "Use 5 different setups",
            category: Exploration,
            metric: |c| distinct_setups(c.trades),
            target: 5.0,
            format: ValueFormat::Count,
        },
    ]
}
