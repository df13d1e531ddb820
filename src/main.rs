use analytics::{
    AchievementContext, AchievementEvaluator, AnalyticsEngine, GrowthComparator, Period,
    PersonalBestsExtractor, StreakTracker, sort_for_display,
};
use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use configuration::{Config, LogLevel};
use core_types::{Continuity, Direction, LabelCatalog, Outcome, PeriodKind, Trade, TradeStatus};
use filters::{TradeFilter, filter_trades};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use storage::{CatalogStore, JsonFileStore, UnlockLogStore, load_snapshot, sync_catalog};
use uuid::Uuid;

mod render;

/// The main entry point for the trading journal CLI.
fn main() -> Result<()> {
    // Load JOURNAL__* overrides from a .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    let _log_guard = configuration::init_tracing(&config.logging)?;

    let store = JsonFileStore::open(&config.storage.data_dir)?;
    let ctx = AppContext {
        today: cli.today.unwrap_or_else(|| Local::now().date_naive()),
        json: cli.json,
        config,
        store,
    };
    tracing::debug!(today = %ctx.today, "Journal started");

    // Execute the appropriate command
    match cli.command {
        Commands::Stats => handle_stats(&ctx),
        Commands::Streaks => handle_streaks(&ctx),
        Commands::Achievements(args) => handle_achievements(&ctx, args),
        Commands::Bests => handle_bests(&ctx),
        Commands::Growth(args) => handle_growth(&ctx, args),
        Commands::Filter(args) => handle_filter(&ctx, args),
        Commands::Tags { command } => handle_tags(&ctx, command),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Analytics, streaks, achievements and tag rules for a personal trading journal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (default: ./journal.toml, if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the journal's JSON collections.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Evaluate as of this date (format: YYYY-MM-DD). Defaults to the local date.
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Adjacency rule for day streaks.
    #[arg(long, global = true, value_enum)]
    continuity: Option<Continuity>,

    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir = dir.clone();
        }
        if let Some(continuity) = self.continuity {
            config.analytics.continuity = continuity;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate performance statistics over all trades.
    Stats,
    /// Winning-day, trading-day, journal and discipline streaks.
    Streaks,
    /// Progress towards every achievement.
    Achievements(AchievementsArgs),
    /// Personal records, most important first.
    Bests,
    /// Compare the current period against the previous one.
    Growth(GrowthArgs),
    /// List trades matching a filter.
    Filter(FilterArgs),
    /// Tag relationship rules.
    Tags {
        #[command(subcommand)]
        command: TagCommands,
    },
}

#[derive(Parser)]
struct AchievementsArgs {
    /// Append newly unlocked achievements to the unlock log.
    #[arg(long)]
    record: bool,
}

#[derive(Parser)]
struct GrowthArgs {
    /// Calendar period to compare (default from configuration).
    #[arg(long, value_enum)]
    period: Option<PeriodKind>,

    /// Start of a custom period; compared against the equally long period before it.
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
}

#[derive(Parser)]
struct FilterArgs {
    /// Case-insensitive text over symbol, setup, notes and tag names.
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    from: Option<NaiveDate>,
    #[arg(long)]
    to: Option<NaiveDate>,
    /// May be repeated; any listed symbol matches.
    #[arg(long = "symbol")]
    symbols: Vec<String>,
    /// Setup name; may be repeated.
    #[arg(long = "setup")]
    setups: Vec<String>,
    /// Tag name; may be repeated.
    #[arg(long = "tag")]
    tags: Vec<String>,
    #[arg(long, value_enum)]
    outcome: Option<Outcome>,
    #[arg(long, value_enum)]
    status: Option<TradeStatus>,
    #[arg(long, value_enum)]
    direction: Option<Direction>,
    #[arg(long, allow_hyphen_values = true)]
    pnl_min: Option<Decimal>,
    #[arg(long, allow_hyphen_values = true)]
    pnl_max: Option<Decimal>,
    #[arg(long, allow_hyphen_values = true)]
    rr_min: Option<Decimal>,
    #[arg(long, allow_hyphen_values = true)]
    rr_max: Option<Decimal>,
    /// true: only days journaled as not following the system; false: all other days.
    #[arg(long)]
    rule_breaking: Option<bool>,
    #[arg(long)]
    has_notes: Option<bool>,
    #[arg(long)]
    has_tags: Option<bool>,
    #[arg(long)]
    has_screenshots: Option<bool>,
    /// Also print statistics for the matching trades.
    #[arg(long)]
    summary: bool,
}

#[derive(Subcommand)]
enum TagCommands {
    /// Check whether a tag can be added to a selection.
    Check {
        /// The tag to add.
        candidate: String,
        /// Tags already selected; may be repeated.
        #[arg(long = "selected")]
        selected: Vec<String>,
    },
    /// Check a complete selection for conflicts and unmet requirements.
    Validate { tags: Vec<String> },
    /// Rewrite the catalog with symmetric exclusions and fresh usage counts.
    Normalize,
}

// ==============================================================================
// Command Logic
// ==============================================================================

struct AppContext {
    config: Config,
    store: JsonFileStore,
    today: NaiveDate,
    json: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_stats(ctx: &AppContext) -> Result<()> {
    let snapshot = load_snapshot(&ctx.store)?;
    let stats = AnalyticsEngine::new().calculate(&snapshot.trades);
    if ctx.json {
        return print_json(&stats);
    }
    render::statistics(&stats, &snapshot.catalog);
    Ok(())
}

fn handle_streaks(ctx: &AppContext) -> Result<()> {
    let snapshot = load_snapshot(&ctx.store)?;
    let streaks = StreakTracker::new(ctx.config.analytics.continuity).calculate(
        &snapshot.trades,
        &snapshot.journal,
        ctx.today,
    );

    let threshold = ctx.config.analytics.losing_streak_warning;
    let warn = streaks.losing_streak_warning(threshold);
    if warn {
        tracing::warn!(days = streaks.current_losing_streak, threshold, "Losing streak");
    }
    if ctx.json {
        return print_json(&streaks);
    }
    render::streaks(&streaks);
    if warn {
        println!(
            "Warning: {} losing days in a row. Consider stepping back and reviewing your plan.",
            streaks.current_losing_streak
        );
    }
    Ok(())
}

fn handle_achievements(ctx: &AppContext, args: AchievementsArgs) -> Result<()> {
    let snapshot = load_snapshot(&ctx.store)?;
    let stats = AnalyticsEngine::new().calculate(&snapshot.trades);
    let streaks = StreakTracker::new(ctx.config.analytics.continuity).calculate(
        &snapshot.trades,
        &snapshot.journal,
        ctx.today,
    );
    let mut achievements = AchievementEvaluator::new().evaluate(&AchievementContext {
        trades: &snapshot.trades,
        stats: &stats,
        journal: &snapshot.journal,
        streaks: &streaks,
    });
    sort_for_display(&mut achievements);

    let mut log = ctx.store.load_unlock_log()?;
    if args.record {
        let newly_unlocked = log.record(&achievements, ctx.today);
        if !newly_unlocked.is_empty() {
            ctx.store.save_unlock_log(&log)?;
        }
    }

    if ctx.json {
        return print_json(&achievements);
    }
    render::achievements(&achievements, &log);
    Ok(())
}

fn handle_bests(ctx: &AppContext) -> Result<()> {
    let snapshot = load_snapshot(&ctx.store)?;
    let analytics = &ctx.config.analytics;
    let bests = PersonalBestsExtractor::new(analytics.recent_window_days, analytics.personal_best_limit)
        .extract(&snapshot.trades, ctx.today);
    if ctx.json {
        return print_json(&bests);
    }
    render::personal_bests(&bests);
    Ok(())
}

fn handle_growth(ctx: &AppContext, args: GrowthArgs) -> Result<()> {
    let snapshot = load_snapshot(&ctx.store)?;
    let comparator = GrowthComparator::new();
    let report = match (args.from, args.to) {
        (Some(from), Some(to)) => {
            let current = Period::new(from, to)?;
            let previous = current.previous()?;
            comparator.compare(&snapshot.trades, current, previous)
        }
        _ => {
            let kind = args.period.unwrap_or(ctx.config.analytics.growth_period);
            comparator.compare_calendar(&snapshot.trades, ctx.today, kind)?
        }
    };
    if ctx.json {
        return print_json(&report);
    }
    render::growth(&report);
    Ok(())
}

fn handle_filter(ctx: &AppContext, args: FilterArgs) -> Result<()> {
    let snapshot = load_snapshot(&ctx.store)?;
    let filter = TradeFilter {
        search: args.search,
        date_from: args.from,
        date_to: args.to,
        symbols: args.symbols.into_iter().collect(),
        setups: resolve_setups(&snapshot.catalog, &args.setups)?,
        tags: resolve_tags(&snapshot.catalog, &args.tags)?,
        outcome: args.outcome,
        status: args.status,
        direction: args.direction,
        pnl_min: args.pnl_min,
        pnl_max: args.pnl_max,
        rr_min: args.rr_min,
        rr_max: args.rr_max,
        rule_breaking: args.rule_breaking,
        has_notes: args.has_notes,
        has_tags: args.has_tags,
        has_screenshots: args.has_screenshots,
    };

    let matched = filter_trades(&snapshot.trades, &snapshot.journal, &snapshot.catalog, &filter);
    let summary = args.summary.then(|| {
        let owned: Vec<Trade> = matched.iter().map(|t| (*t).clone()).collect();
        AnalyticsEngine::new().calculate(&owned)
    });

    if ctx.json {
        #[derive(Serialize)]
        struct FilterOutput<'a> {
            trades: &'a [&'a Trade],
            #[serde(skip_serializing_if = "Option::is_none")]
            summary: Option<&'a analytics::Statistics>,
        }
        return print_json(&FilterOutput {
            trades: &matched,
            summary: summary.as_ref(),
        });
    }
    render::trades(&matched, &snapshot.catalog);
    if let Some(stats) = &summary {
        render::statistics(stats, &snapshot.catalog);
    }
    Ok(())
}

fn handle_tags(ctx: &AppContext, command: TagCommands) -> Result<()> {
    match command {
        TagCommands::Check { candidate, selected } => {
            let catalog = ctx.store.load_catalog()?;
            let candidate_id = resolve_tag(&catalog, &candidate)?;
            let selected = resolve_tags(&catalog, &selected)?;
            let result = tags::validate_tag_addition(&selected, candidate_id, &catalog);
            if ctx.json {
                return print_json(&result);
            }
            render::tag_validation(&candidate, &result);
        }
        TagCommands::Validate { tags: names } => {
            let catalog = ctx.store.load_catalog()?;
            let selected = resolve_tags(&catalog, &names)?;
            let result = tags::validate_selection(&selected, &catalog);
            if ctx.json {
                return print_json(&result);
            }
            render::selection_validation(&result);
        }
        TagCommands::Normalize => {
            let summary = sync_catalog(&ctx.store)?;
            if ctx.json {
                return print_json(&summary);
            }
            println!(
                "Catalog normalized: {} exclusion(s) mirrored, {} dangling reference(s) dropped.",
                summary.mirrored_exclusions, summary.dropped_references
            );
        }
    }
    Ok(())
}

// ==============================================================================
// Name Resolution
// ==============================================================================

fn resolve_tag(catalog: &LabelCatalog, name: &str) -> Result<Uuid> {
    catalog
        .tag_by_name(name)
        .map(|t| t.id)
        .with_context(|| format!("Unknown tag '{name}'"))
}

fn resolve_tags(catalog: &LabelCatalog, names: &[String]) -> Result<BTreeSet<Uuid>> {
    names.iter().map(|name| resolve_tag(catalog, name)).collect()
}

fn resolve_setups(catalog: &LabelCatalog, names: &[String]) -> Result<BTreeSet<Uuid>> {
    let mut ids = BTreeSet::new();
    for name in names {
        match catalog.setup_by_name(name) {
            Some(setup) => {
                ids.insert(setup.id);
            }
            None => bail!("Unknown setup '{name}'"),
        }
    }
    Ok(ids)
}
