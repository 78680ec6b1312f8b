//! Turns a raw commit table into an analysis-ready `NormalizedTable`.

use crate::error::{GitpulseError, Result};
use crate::model::{AuthorCount, NormalizedCommit, NormalizedTable};
use crate::table::RawTable;
use crate::util::month_key;
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::{info, warn};

pub const REQUIRED_COLUMNS: [&str; 4] = ["commit_hash", "author", "date", "message"];

/// Numeric columns and the value used when the whole column is absent.
pub const NUMERIC_DEFAULTS: [(&str, u64); 3] =
    [("lines_added", 0), ("lines_deleted", 0), ("files_changed", 1)];

pub const DERIVED_COLUMNS: [&str; 5] = ["date_only", "hour", "day_of_week", "month", "is_core"];

/// Fraction of distinct authors counted as core contributors.
pub const CORE_AUTHOR_SHARE: f64 = 0.2;

const STRICT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static OFFSET_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+-]\d{2}:\d{2}$").expect("valid offset regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum DateRepair {
    None,
    Median(NaiveDateTime),
    Now(NaiveDateTime),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyCells {
    pub column: String,
    pub count: usize,
}

/// Non-fatal anomalies found while normalizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeReport {
    pub rows: usize,
    pub empty_cells: Vec<EmptyCells>,
    pub defaulted_columns: Vec<String>,
    pub coerced_numbers: usize,
    pub invalid_dates: usize,
    pub repair: DateRepair,
}

#[derive(Debug, Clone)]
pub struct Normalized {
    pub table: NormalizedTable,
    pub report: NormalizeReport,
}

pub fn normalize(raw: &RawTable) -> Result<Normalized> {
    normalize_at(raw, Local::now().naive_local())
}

/// Like `normalize`, with the "now" used when no date parses supplied by the caller.
pub fn normalize_at(raw: &RawTable, now: NaiveDateTime) -> Result<Normalized> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| raw.column_index(c).is_none())
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(GitpulseError::Schema(missing));
    }

    let col = |name: &str| raw.column_index(name).unwrap_or(usize::MAX);
    let (hash_col, author_col, date_col, message_col) =
        (col("commit_hash"), col("author"), col("date"), col("message"));

    let empty_cells = count_empty_cells(raw);
    for e in &empty_cells {
        warn!(column = %e.column, count = e.count, "column has empty cells");
    }

    let mut defaulted_columns = Vec::new();
    let mut coerced_numbers = 0usize;
    let numeric: Vec<Vec<u64>> = NUMERIC_DEFAULTS
        .iter()
        .map(|(name, default)| match raw.column_index(name) {
            Some(idx) => (0..raw.len())
                .map(|row| {
                    parse_count(raw.cell(row, idx)).unwrap_or_else(|| {
                        coerced_numbers += 1;
                        0
                    })
                })
                .collect(),
            None => {
                defaulted_columns.push(name.to_string());
                vec![*default; raw.len()]
            }
        })
        .collect();
    if coerced_numbers > 0 {
        warn!(count = coerced_numbers, "coerced empty or invalid numeric cells to 0");
    }

    let parsed: Vec<Option<NaiveDateTime>> = (0..raw.len())
        .map(|row| parse_date(raw.cell(row, date_col)))
        .collect();
    let invalid_dates = parsed.iter().filter(|d| d.is_none()).count();
    info!(invalid = invalid_dates, rows = raw.len(), "parsed date column");
    let (dates, repair) = repair_dates(&parsed, now);
    match repair {
        DateRepair::Median(ts) => warn!(%ts, count = invalid_dates, "replaced invalid dates with median"),
        DateRepair::Now(ts) => warn!(%ts, "no valid dates; using current time for every row"),
        DateRepair::None => {}
    }

    let skip: HashSet<&str> = REQUIRED_COLUMNS
        .iter()
        .chain(NUMERIC_DEFAULTS.iter().map(|(n, _)| n))
        .chain(DERIVED_COLUMNS.iter())
        .copied()
        .collect();
    let extra_idx: Vec<usize> = raw
        .headers()
        .iter()
        .enumerate()
        .filter(|(_, h)| !skip.contains(h.as_str()))
        .map(|(i, _)| i)
        .collect();
    let extra_columns = extra_idx.iter().map(|&i| raw.headers()[i].clone()).collect();

    let core = core_authors(&rank_authors((0..raw.len()).map(|row| raw.cell(row, author_col))));

    let rows = dates
        .into_iter()
        .enumerate()
        .map(|(row, timestamp)| {
            let author = raw.cell(row, author_col).to_string();
            NormalizedCommit {
                commit_hash: raw.cell(row, hash_col).to_string(),
                is_core: core.contains(&author),
                author,
                timestamp,
                message: raw.cell(row, message_col).to_string(),
                lines_added: numeric[0][row],
                lines_deleted: numeric[1][row],
                files_changed: numeric[2][row],
                date_only: timestamp.date(),
                hour: timestamp.hour(),
                day_of_week: timestamp.weekday(),
                month: month_key(&timestamp),
                extra: extra_idx.iter().map(|&i| raw.cell(row, i).to_string()).collect(),
            }
        })
        .collect();

    Ok(Normalized {
        table: NormalizedTable { extra_columns, rows },
        report: NormalizeReport {
            rows: raw.len(),
            empty_cells,
            defaulted_columns,
            coerced_numbers,
            invalid_dates,
            repair,
        },
    })
}

fn count_empty_cells(raw: &RawTable) -> Vec<EmptyCells> {
    raw.headers()
        .iter()
        .enumerate()
        .filter_map(|(idx, column)| {
            let count = (0..raw.len())
                .filter(|&row| raw.cell(row, idx).trim().is_empty())
                .count();
            (count > 0).then(|| EmptyCells {
                column: column.clone(),
                count,
            })
        })
        .collect()
}

/// Non-negative integer cell, accepting float renderings such as `5.0`.
/// Fractional values like `5.7` are rejected.
fn parse_count(cell: &str) -> Option<u64> {
    let cell = cell.trim();
    if let Ok(n) = cell.parse::<u64>() {
        return Some(n);
    }
    match cell.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 => Some(f as u64),
        _ => None,
    }
}

/// Parses one raw date cell; `None` is the "no date" sentinel.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if s.contains('T') {
        return parse_iso(s);
    }
    if let Some(m) = OFFSET_SUFFIX.find(s) {
        return NaiveDateTime::parse_from_str(s[..m.start()].trim(), STRICT_FORMAT).ok();
    }
    NaiveDateTime::parse_from_str(s, STRICT_FORMAT)
        .ok()
        .or_else(|| parse_generic(s))
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
}

fn parse_generic(s: &str) -> Option<NaiveDateTime> {
    const NAIVE: [&str; 5] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%d.%m.%Y %H:%M:%S",
    ];
    const DATE_ONLY: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

    NAIVE
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z")
                .or_else(|_| DateTime::parse_from_rfc2822(s))
                .or_else(|_| DateTime::parse_from_rfc3339(s))
                .ok()
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            DATE_ONLY
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Fills sentinels with the median parsed date, or with `now` if nothing parsed.
pub fn repair_dates(
    parsed: &[Option<NaiveDateTime>],
    now: NaiveDateTime,
) -> (Vec<NaiveDateTime>, DateRepair) {
    let mut valid: Vec<NaiveDateTime> = parsed.iter().flatten().copied().collect();
    if valid.len() == parsed.len() {
        return (valid, DateRepair::None);
    }
    if valid.is_empty() {
        return (vec![now; parsed.len()], DateRepair::Now(now));
    }

    valid.sort();
    let median = median_of_sorted(&valid);
    let dates = parsed.iter().map(|d| d.unwrap_or(median)).collect();
    (dates, DateRepair::Median(median))
}

fn median_of_sorted(sorted: &[NaiveDateTime]) -> NaiveDateTime {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        return sorted[mid];
    }
    let (lo, hi) = (sorted[mid - 1], sorted[mid]);
    lo + (hi - lo) / 2
}

/// Commit counts per author, descending; equal counts keep first-seen order.
/// Empty author cells are not ranked.
pub fn rank_authors<'a, I>(authors: I) -> Vec<AuthorCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut ranking: Vec<AuthorCount> = Vec::new();
    for author in authors {
        if author.trim().is_empty() {
            continue;
        }
        let slot = *index.entry(author).or_insert_with(|| {
            ranking.push(AuthorCount {
                author: author.to_string(),
                commits: 0,
            });
            ranking.len() - 1
        });
        ranking[slot].commits += 1;
    }
    ranking.sort_by(|a, b| b.commits.cmp(&a.commits));
    ranking
}

pub fn core_author_count(distinct_authors: usize) -> usize {
    ((distinct_authors as f64 * CORE_AUTHOR_SHARE).ceil() as usize).max(1)
}

pub fn core_authors(ranking: &[AuthorCount]) -> HashSet<String> {
    ranking
        .iter()
        .take(core_author_count(ranking.len()))
        .map(|a| a.author.clone())
        .collect()
}
