//! # Journal Analytics Engine
//!
//! Derives everything the journal shows about past performance: statistics,
//! day streaks, achievement progress, personal bests and period-over-period growth.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** Depends only on `core-types`. No I/O, no clocks: "today" is
//!   always a parameter.
//! - **Stateless Calculation:** Every calculator borrows an immutable snapshot and
//!   returns a freshly derived value. Nothing is cached between calls, so the same
//!   input always produces the same output and all calculators are safe to share
//!   across threads.
//!
//! ## Public API
//!
//! - `AnalyticsEngine` / `Statistics`: aggregate trade statistics.
//! - `StreakTracker` / `StreakSummary`: day-based streak families.
//! - `AchievementEvaluator` / `AchievementProgress`: achievement catalog evaluation.
//! - `UnlockLog`: optional append-only record of first unlock dates.
//! - `PersonalBestsExtractor` / `PersonalBest`: superlative records.
//! - `GrowthComparator` / `GrowthReport`: period-over-period comparison.

// Declare the modules that constitute this crate.
pub mod achievements;
mod daily;
pub mod engine;
pub mod error;
pub mod growth;
pub mod personal_bests;
pub mod report;
pub mod streaks;
pub mod unlock_log;

// Re-export the key components to create a clean, public-facing API.
pub use achievements::{
    AchievementCategory, AchievementContext, AchievementDefinition, AchievementEvaluator,
    AchievementProgress, ValueFormat, sort_for_display,
};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use growth::{GrowthComparator, GrowthMetric, GrowthReport, MetricComparison, Period, Polarity, Trend};
pub use personal_bests::{PersonalBest, PersonalBestKind, PersonalBestsExtractor};
pub use report::{DailyPnl, GroupStats, Statistics};
pub use streaks::{Streak, StreakSummary, StreakTracker};
pub use unlock_log::{UnlockLog, UnlockRecord};
