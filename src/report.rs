//! Renders an `AnalysisResult`: terminal charts, JSON, markdown report, summary text.

use crate::config::{AnalysisOptions, OutputLayout};
use crate::error::Result;
use crate::model::{AnalysisOutput, AnalysisResult, ChangeGranularity, Level, NormalizedTable, SCHEMA_VERSION};
use crate::normalize::NormalizeReport;
use crate::table::write_normalized;
use chrono::NaiveDateTime;
use console::style;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tracing::info;

const BAR_WIDTH: usize = 40;

pub fn build_output(result: &AnalysisResult, report: &NormalizeReport, source: &str) -> AnalysisOutput {
    AnalysisOutput {
        version: SCHEMA_VERSION,
        generated_at: chrono::Utc::now(),
        source: source.to_string(),
        normalization: report.clone(),
        analysis: result.clone(),
    }
}

pub fn output_json(output: &AnalysisOutput) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

pub fn output_ndjson(result: &AnalysisResult) -> anyhow::Result<()> {
    for month in &result.monthly_stats {
        println!("{}", serde_json::to_string(month)?);
    }
    Ok(())
}

fn bar(value: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let len = ((value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len)
}

fn no_data(value: Option<f64>) -> String {
    value.map_or_else(|| "no data".to_string(), |v| format!("{v:.1}"))
}

fn date_span(first: Option<NaiveDateTime>, last: Option<NaiveDateTime>) -> String {
    match (first, last) {
        (Some(f), Some(l)) => format!("{} to {}", f.format("%Y-%m-%d"), l.format("%Y-%m-%d")),
        _ => "no data".to_string(),
    }
}

pub fn output_terminal(result: &AnalysisResult, options: &AnalysisOptions) -> anyhow::Result<()> {
    let s = &result.summary;
    if s.total_commits == 0 {
        println!("No data to display");
        return Ok(());
    }

    println!("{}", style("Commits by Weekday").bold());
    println!("{}", "─".repeat(60));
    let max = result.weekday_counts.iter().map(|w| w.commits).max().unwrap_or(0);
    for w in &result.weekday_counts {
        println!("{:<10} {:>5} {}", w.day, w.commits, style(bar(w.commits, max)).green());
    }

    println!("\n{}", style("Commits by Hour").bold());
    println!("{}", "─".repeat(60));
    let max = result.hour_counts.iter().map(|h| h.commits).max().unwrap_or(0);
    for h in &result.hour_counts {
        let line = bar(h.commits, max);
        let line = if (8..19).contains(&h.hour) {
            style(line).blue()
        } else {
            style(line).dim()
        };
        println!("{:02}:00 {:>5} {}", h.hour, h.commits, line);
    }

    println!("\n{}", style("Top Contributors").bold());
    println!("{}", "─".repeat(60));
    let view = result.top_authors(options.top_authors);
    let max = view.iter().map(|a| a.commits).max().unwrap_or(0);
    for a in &view {
        println!("{:<28} {:>5} {}", a.author, a.commits, style(bar(a.commits, max)).yellow());
    }

    println!("\n{}", style("Commit Message Types").bold());
    println!("{}", "─".repeat(60));
    for c in result.pie_slices() {
        let pct = crate::util::percentage(c.commits as f64, s.total_commits as f64);
        println!("{:<10} {:>5} {:>6.1}%", c.category.as_str(), c.commits, pct);
    }

    println!("\n{}", style("Monthly Trend").bold());
    println!("{}", "─".repeat(60));
    let max = result.monthly_stats.iter().map(|m| m.commit_count).max().unwrap_or(0);
    for m in &result.monthly_stats {
        let net = if m.net_change >= 0 {
            style(format!("{:+}", m.net_change)).green()
        } else {
            style(format!("{:+}", m.net_change)).red()
        };
        println!(
            "{} {:>5} {:>9} {}",
            m.month,
            m.commit_count,
            net,
            style(bar(m.commit_count, max)).cyan()
        );
    }

    println!("\n{}", style("Summary").bold());
    println!("{}", "─".repeat(60));
    println!("Total commits: {}", style(s.total_commits).cyan());
    println!("Contributors: {}", style(s.distinct_authors).yellow());
    println!(
        "Core contributors: {} ({:.1}% of commits)",
        s.core_contributors, s.core_commit_share
    );
    println!(
        "Mean lines per commit: {} {}",
        style(format!("+{}", no_data(s.mean_lines_added))).green(),
        style(format!("-{}", no_data(s.mean_lines_deleted))).red()
    );
    println!("Busiest weekday: {}", s.busiest_weekday);
    println!("Busiest hour: {:02}:00", s.busiest_hour);
    println!("Top contributor: {}", s.top_author.as_deref().unwrap_or("unknown"));
    println!(
        "Date range: {}",
        style(date_span(s.first_commit, s.last_commit)).dim()
    );
    Ok(())
}

fn label<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "no data".to_string(), |v| v.to_string())
}

fn timestamp(output: &AnalysisOutput) -> String {
    output.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub fn render_markdown(output: &AnalysisOutput, options: &AnalysisOptions) -> Result<String> {
    let r = &output.analysis;
    let s = &r.summary;
    let p = &s.profile;
    let mut md = String::new();

    writeln!(md, "# Commit History Analysis Report\n")?;
    writeln!(md, "## Overview\n")?;
    writeln!(md, "- **Source**: {}", output.source)?;
    writeln!(md, "- **Generated**: {}", timestamp(output))?;
    writeln!(md, "- **Commits analyzed**: {}", s.total_commits)?;
    writeln!(md, "- **Time span**: {}", date_span(s.first_commit, s.last_commit))?;
    writeln!(md, "- **Activity score**: {}/100\n", s.activity_score)?;

    writeln!(md, "## Key Metrics\n")?;
    writeln!(md, "| Metric | Value |")?;
    writeln!(md, "|---|---|")?;
    writeln!(md, "| Total commits | {} |", s.total_commits)?;
    writeln!(md, "| Contributors | {} |", s.distinct_authors)?;
    writeln!(
        md,
        "| Core contributors | {} ({:.1}% of commits) |",
        s.core_contributors, s.core_commit_share
    )?;
    writeln!(md, "| Files changed | {} |", s.total_files_changed)?;
    writeln!(
        md,
        "| Mean change per commit | +{} / -{} lines |\n",
        no_data(s.mean_lines_added),
        no_data(s.mean_lines_deleted)
    )?;

    writeln!(md, "## Time Distribution\n")?;
    writeln!(
        md,
        "- **Busiest weekday**: {} ({} commits)",
        s.busiest_weekday,
        r.weekday(&s.busiest_weekday)
    )?;
    writeln!(
        md,
        "- **Busiest hour**: {:02}:00-{:02}:00 ({} commits)",
        s.busiest_hour,
        (s.busiest_hour + 1) % 24,
        r.hour(s.busiest_hour)
    )?;
    writeln!(md, "- **Workday share**: {:.1}%", s.workday_share)?;
    writeln!(md, "- **Mean commits per month**: {}", no_data(s.mean_commits_per_month))?;
    if let Some(latest) = r.monthly_stats.last() {
        writeln!(
            md,
            "- **Latest month**: {} ({} commits, net {:+} lines)",
            latest.month, latest.commit_count, latest.net_change
        )?;
    }
    writeln!(md)?;

    writeln!(md, "| Weekday | Commits |")?;
    writeln!(md, "|---|---|")?;
    for w in &r.weekday_counts {
        writeln!(md, "| {} | {} |", w.day, w.commits)?;
    }
    writeln!(md)?;

    writeln!(md, "## Contributors\n")?;
    match &s.top_author {
        Some(top) => writeln!(md, "- **Most active contributor**: {} ({} commits)", top, r.author(top))?,
        None => writeln!(md, "- **Most active contributor**: no data")?,
    }
    writeln!(
        md,
        "- **External share**: {:.1}% of commits come from outside the core group",
        if s.total_commits == 0 { 0.0 } else { 100.0 - s.core_commit_share }
    )?;
    writeln!(md, "- **Newcomer friendliness**: {}", label(p.newcomer_friendliness))?;
    writeln!(md, "- **Maintenance**: {}\n", p.maintenance)?;
    writeln!(md, "| Author | Commits | Active days | Commits/day |")?;
    writeln!(md, "|---|---|---|---|")?;
    for a in r.top_authors(options.top_authors) {
        match r.author_activity.iter().find(|x| x.author == a.author) {
            Some(activity) => writeln!(
                md,
                "| {} | {} | {} | {:.2} |",
                a.author, a.commits, activity.active_days, activity.commits_per_active_day
            )?,
            None => writeln!(md, "| {} | {} | - | - |", a.author, a.commits)?,
        }
    }
    writeln!(md)?;

    writeln!(md, "## Commit Messages\n")?;
    match s.dominant_category {
        Some(c) => writeln!(md, "- **Most common type**: {} ({} commits)", c, r.category(c))?,
        None => writeln!(md, "- **Most common type**: no data")?,
    }
    writeln!(md, "- **Keyword convention**: {}", label(p.keyword_convention))?;
    writeln!(md, "- **Test attention**: {}", label(p.test_attention))?;
    writeln!(md, "- **Mean message length**: {} characters\n", no_data(s.mean_message_length))?;
    writeln!(md, "| Type | Commits |")?;
    writeln!(md, "|---|---|")?;
    for c in &r.message_category_counts {
        writeln!(md, "| {} | {} |", c.category, c.commits)?;
    }
    writeln!(md)?;

    writeln!(md, "## Change Profile\n")?;
    writeln!(md, "- **Mean lines added**: {}", no_data(s.mean_lines_added))?;
    writeln!(md, "- **Mean lines deleted**: {}", no_data(s.mean_lines_deleted))?;
    writeln!(
        md,
        "- **Change granularity**: {} lines per commit ({})",
        no_data(s.mean_change_size),
        label(p.change_granularity)
    )?;
    writeln!(md, "- **Mean files changed**: {}", no_data(s.mean_files_changed))?;
    let net: i64 = r.monthly_stats.iter().map(|m| m.net_change).sum();
    writeln!(md, "- **Net line change**: {net:+}\n")?;

    writeln!(md, "## Monthly Trend\n")?;
    writeln!(md, "| Month | Commits | Authors | Added | Deleted | Files | Net |")?;
    writeln!(md, "|---|---|---|---|---|---|---|")?;
    for m in &r.monthly_stats {
        writeln!(
            md,
            "| {} | {} | {} | {} | {} | {} | {:+} |",
            m.month,
            m.commit_count,
            m.distinct_author_count,
            m.lines_added_sum,
            m.lines_deleted_sum,
            m.files_changed_sum,
            m.net_change
        )?;
    }
    writeln!(md)?;

    if s.total_commits > 0 {
        writeln!(md, "## Recommendations\n")?;
        writeln!(
            md,
            "- Schedule review capacity around {:02}:00, the busiest commit hour.",
            s.busiest_hour
        )?;
        if p.newcomer_friendliness == Some(Level::Low) {
            writeln!(md, "- Few contributors per commit: a contributing guide may lower the entry barrier.")?;
        }
        if p.test_attention == Some(Level::Low) {
            writeln!(md, "- Test-related commits are rare.")?;
        }
        if p.change_granularity == Some(ChangeGranularity::Coarse) {
            writeln!(md, "- Commits are large; smaller changes are easier to review.")?;
        }
        writeln!(md)?;
    }

    let n = &output.normalization;
    writeln!(md, "## Data Quality\n")?;
    writeln!(md, "- Rows read: {}", n.rows)?;
    writeln!(md, "- Invalid dates repaired: {}", n.invalid_dates)?;
    writeln!(md, "- Numeric cells coerced to 0: {}", n.coerced_numbers)?;
    for e in &n.empty_cells {
        writeln!(md, "- Empty `{}` cells: {}", e.column, e.count)?;
    }
    writeln!(md)?;

    writeln!(md, "## Generated Files\n")?;
    writeln!(md, "- `processed_data.csv`: normalized commit table")?;
    writeln!(md, "- `analysis.json`: structured analysis result")?;
    writeln!(md, "- `summary.txt`: short plain-text summary")?;
    Ok(md)
}

pub fn render_summary(output: &AnalysisOutput) -> Result<String> {
    let s = &output.analysis.summary;
    let mut text = String::new();
    writeln!(text, "Commit History Summary")?;
    writeln!(text, "======================")?;
    writeln!(text, "Source: {}", output.source)?;
    writeln!(text, "Generated: {}", timestamp(output))?;
    writeln!(text, "Total commits: {}", s.total_commits)?;
    writeln!(text, "Contributors: {}", s.distinct_authors)?;
    writeln!(text, "Time span: {}", date_span(s.first_commit, s.last_commit))?;
    writeln!(text, "Busiest weekday: {}", s.busiest_weekday)?;
    writeln!(
        text,
        "Busiest hour: {:02}:00-{:02}:00",
        s.busiest_hour,
        (s.busiest_hour + 1) % 24
    )?;
    writeln!(text, "Top contributor: {}", s.top_author.as_deref().unwrap_or("unknown"))?;
    writeln!(text, "\nSee analysis_report.md for the full report.")?;
    Ok(text)
}

/// Writes every output file, replacing previous versions.
pub fn write_outputs(
    layout: &OutputLayout,
    table: &NormalizedTable,
    output: &AnalysisOutput,
    options: &AnalysisOptions,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&layout.dir)?;

    write_normalized(&layout.processed_data(), table)?;
    fs::write(layout.analysis_json(), serde_json::to_string_pretty(output)?)?;
    fs::write(layout.report(), render_markdown(output, options)?)?;
    fs::write(layout.summary(), render_summary(output)?)?;

    let written = vec![
        layout.processed_data(),
        layout.analysis_json(),
        layout.report(),
        layout.summary(),
    ];
    for path in &written {
        let size = fs::metadata(path)?.len();
        info!(path = %path.display(), bytes = size, "wrote output");
    }
    Ok(written)
}
