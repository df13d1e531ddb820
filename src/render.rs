//! Terminal tables for the journal commands.

use analytics::{
    AchievementProgress, GroupStats, GrowthReport, PersonalBest, Statistics, StreakSummary, Trend,
    UnlockLog,
};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use core_types::{LabelCatalog, Trade};
use rust_decimal::Decimal;
use tags::{SelectionValidation, TagValidation};

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn pnl_cell(value: Decimal) -> Cell {
    let cell = Cell::new(money(value));
    if value > Decimal::ZERO {
        cell.fg(Color::Green)
    } else if value < Decimal::ZERO {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

fn ratio(value: f64) -> String {
    if value.is_infinite() {
        "∞".to_string()
    } else {
        format!("{value:.2}")
    }
}

pub fn statistics(stats: &Statistics, catalog: &LabelCatalog) {
    let mut summary = table(vec!["Metric", "Value"]);
    summary
        .add_row(vec![Cell::new("Closed trades"), Cell::new(stats.total_trades)])
        .add_row(vec![
            Cell::new("Wins / Losses / Breakeven"),
            Cell::new(format!(
                "{} / {} / {}",
                stats.winning_trades, stats.losing_trades, stats.breakeven_trades
            )),
        ])
        .add_row(vec![Cell::new("Open trades"), Cell::new(stats.open_trades)])
        .add_row(vec![Cell::new("Win rate"), Cell::new(format!("{:.1}%", stats.win_rate))])
        .add_row(vec![Cell::new("Total P&L"), pnl_cell(stats.total_pnl)])
        .add_row(vec![Cell::new("Average win"), Cell::new(money(stats.avg_win))])
        .add_row(vec![Cell::new("Average loss"), Cell::new(money(stats.avg_loss))])
        .add_row(vec![Cell::new("Largest win"), Cell::new(money(stats.largest_win))])
        .add_row(vec![Cell::new("Largest loss"), Cell::new(money(stats.largest_loss))])
        .add_row(vec![Cell::new("Profit factor"), Cell::new(ratio(stats.profit_factor))])
        .add_row(vec![Cell::new("Expectancy"), Cell::new(money(stats.expectancy))])
        .add_row(vec![
            Cell::new("Total R"),
            Cell::new(format!("{}R over {} trades", stats.total_rr.round_dp(2), stats.rr_trades)),
        ])
        .add_row(vec![Cell::new("Expectancy (R)"), Cell::new(stats.expectancy_rr.round_dp(2))])
        .add_row(vec![Cell::new("Current streak"), Cell::new(stats.current_streak)])
        .add_row(vec![
            Cell::new("Longest win / loss streak"),
            Cell::new(format!("{} / {}", stats.longest_win_streak, stats.longest_lose_streak)),
        ]);
    if let Some(best) = &stats.best_day {
        summary.add_row(vec![Cell::new(format!("Best day ({})", best.date)), pnl_cell(best.pnl)]);
    }
    if let Some(worst) = &stats.worst_day {
        summary.add_row(vec![Cell::new(format!("Worst day ({})", worst.date)), pnl_cell(worst.pnl)]);
    }
    println!("{summary}");

    let by_day = stats
        .performance_by_day
        .iter()
        .map(|(day, group)| (format!("{day:?}"), group));
    println!("{}", group_table("Day", by_day));

    if !stats.performance_by_setup.is_empty() {
        let by_setup = stats.performance_by_setup.iter().map(|(id, group)| {
            let name = catalog.setup_name(id).map(str::to_string).unwrap_or_else(|| id.to_string());
            (name, group)
        });
        println!("{}", group_table("Setup", by_setup));
    }

    let by_symbol = stats
        .performance_by_symbol
        .iter()
        .map(|(symbol, group)| (symbol.clone(), group));
    println!("{}", group_table("Symbol", by_symbol));
}

fn group_table<'a>(label: &str, groups: impl Iterator<Item = (String, &'a GroupStats)>) -> Table {
    let mut t = table(vec![label, "Trades", "Wins", "Losses", "Win rate", "P&L", "R"]);
    for (name, group) in groups {
        t.add_row(vec![
            Cell::new(name),
            Cell::new(group.trades),
            Cell::new(group.wins),
            Cell::new(group.losses),
            Cell::new(format!("{:.1}%", group.win_rate)),
            pnl_cell(group.pnl),
            Cell::new(group.rr.round_dp(2)),
        ]);
    }
    t
}

pub fn streaks(summary: &StreakSummary) {
    let mut t = table(vec!["Streak", "Current", "Best"]);
    for (name, streak) in [
        ("Winning days", summary.winning_days),
        ("Trading days", summary.trading_days),
        ("Journal days", summary.journal),
        ("Followed the system", summary.system_adherence),
    ] {
        t.add_row(vec![Cell::new(name), Cell::new(streak.current), Cell::new(streak.best)]);
    }
    println!("{t}");
}

pub fn achievements(achievements: &[AchievementProgress], log: &UnlockLog) {
    let mut t = table(vec!["", "Achievement", "Category", "Progress", "Unlocked"]);
    for a in achievements {
        let mark = if a.is_unlocked {
            Cell::new("★").fg(Color::Yellow)
        } else {
            Cell::new("")
        };
        let unlocked = log
            .first_unlocked(&a.id)
            .map(|d| d.to_string())
            .unwrap_or_default();
        t.add_row(vec![
            mark,
            Cell::new(format!("{}\n{}", a.title, a.description)),
            Cell::new(format!("{:?}", a.category)),
            Cell::new(format!(
                "{} / {} ({:.0}%)",
                a.formatted_current, a.formatted_target, a.progress
            )),
            Cell::new(unlocked),
        ]);
    }
    println!("{t}");
}

pub fn personal_bests(bests: &[PersonalBest]) {
    if bests.is_empty() {
        println!("No personal bests yet. Close a profitable trade to set the first one.");
        return;
    }
    let mut t = table(vec!["Record", "Value", "Date", "Detail"]);
    for best in bests {
        let title = if best.is_recent {
            Cell::new(format!("{} (new)", best.title)).fg(Color::Green)
        } else {
            Cell::new(&best.title)
        };
        t.add_row(vec![
            title,
            Cell::new(best.value.round_dp(2)),
            Cell::new(best.date),
            Cell::new(best.detail.as_deref().unwrap_or("")),
        ]);
    }
    println!("{t}");
}

pub fn growth(report: &GrowthReport) {
    println!(
        "{} – {} vs {} – {}",
        report.current_period.start,
        report.current_period.end,
        report.previous_period.start,
        report.previous_period.end
    );
    let mut t = table(vec!["Metric", "Current", "Previous", "Change"]);
    for m in &report.metrics {
        let arrow = match m.trend {
            Trend::Up => "▲",
            Trend::Down => "▼",
            Trend::Neutral => "–",
        };
        let change = Cell::new(format!("{arrow} {}%", ratio(m.change_percent)));
        let change = match (m.trend, m.is_positive) {
            (Trend::Neutral, _) => change,
            (_, true) => change.fg(Color::Green),
            (_, false) => change.fg(Color::Red),
        };
        t.add_row(vec![
            Cell::new(&m.label),
            Cell::new(ratio(m.current)),
            Cell::new(ratio(m.previous)),
            change,
        ]);
    }
    println!("{t}");
}

pub fn trades(trades: &[&Trade], catalog: &LabelCatalog) {
    let mut t = table(vec!["Date", "Symbol", "Side", "Status", "P&L", "R", "Setup", "Tags"]);
    for trade in trades {
        let setup = trade
            .setup
            .and_then(|id| catalog.setup_name(&id))
            .unwrap_or("");
        let tags: Vec<&str> = trade.tags.iter().filter_map(|id| catalog.tag_name(id)).collect();
        t.add_row(vec![
            Cell::new(trade.date),
            Cell::new(&trade.symbol),
            Cell::new(format!("{:?}", trade.direction)),
            Cell::new(format!("{:?}", trade.status)),
            pnl_cell(trade.pnl),
            Cell::new(trade.rr.map(|r| r.round_dp(2).to_string()).unwrap_or_default()),
            Cell::new(setup),
            Cell::new(tags.join(", ")),
        ]);
    }
    println!("{t}");
    println!("{} trade(s)", trades.len());
}

pub fn tag_validation(candidate: &str, result: &TagValidation) {
    if result.is_valid {
        println!("'{candidate}' can be added.");
    } else {
        println!("'{candidate}' conflicts with: {}", result.conflicts.join(", "));
    }
    if !result.required.is_empty() {
        println!("Requires: {}", result.required.join(", "));
    }
    if !result.suggestions.is_empty() {
        println!("Often used with: {}", result.suggestions.join(", "));
    }
}

pub fn selection_validation(result: &SelectionValidation) {
    if result.is_valid {
        println!("Selection is valid.");
        return;
    }
    for pair in &result.conflicts {
        println!("Conflict: '{}' and '{}' are mutually exclusive", pair.tag, pair.other);
    }
    for pair in &result.missing_required {
        println!("Missing: '{}' requires '{}'", pair.tag, pair.other);
    }
}
