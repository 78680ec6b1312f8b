use crate::normalize::NormalizeReport;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SCHEMA_VERSION: u32 = 1;

/// Subjects longer than this are cut at parse time.
pub const MESSAGE_MAX_CHARS: usize = 80;

pub const SHORT_HASH_LEN: usize = 7;

pub const OTHER_AUTHORS_LABEL: &str = "Other contributors";

/// One commit as produced by the log parser and persisted in the commit table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    #[serde(rename = "commit_hash")]
    pub short_hash: String,
    pub author: String,
    #[serde(rename = "date")]
    pub timestamp: String,
    pub message: String,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub files_changed: u64,
}

/// A row of the normalized table. Values of input columns the pipeline does not
/// interpret are kept in `extra`, aligned with `NormalizedTable::extra_columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCommit {
    pub commit_hash: String,
    pub author: String,
    pub timestamp: NaiveDateTime,
    pub message: String,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub files_changed: u64,
    pub date_only: NaiveDate,
    pub hour: u32,
    pub day_of_week: Weekday,
    pub month: String,
    pub is_core: bool,
    pub extra: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTable {
    pub extra_columns: Vec<String>,
    pub rows: Vec<NormalizedCommit>,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageCategory {
    Fix,
    Feature,
    Refactor,
    Docs,
    Test,
    Perf,
    Chore,
    Other,
}

impl MessageCategory {
    /// Priority order used by the classifier; `Other` is the fallback.
    pub const ALL: [MessageCategory; 8] = [
        MessageCategory::Fix,
        MessageCategory::Feature,
        MessageCategory::Refactor,
        MessageCategory::Docs,
        MessageCategory::Test,
        MessageCategory::Perf,
        MessageCategory::Chore,
        MessageCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageCategory::Fix => "fix",
            MessageCategory::Feature => "feature",
            MessageCategory::Refactor => "refactor",
            MessageCategory::Docs => "docs",
            MessageCategory::Test => "test",
            MessageCategory::Perf => "perf",
            MessageCategory::Chore => "chore",
            MessageCategory::Other => "other",
        }
    }
}

impl fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three-step rating used by the report's qualitative labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::High => "high",
            Level::Medium => "medium",
            Level::Low => "low",
        })
    }
}

/// Size class of the mean commit (lines added plus deleted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeGranularity {
    Fine,
    Medium,
    Coarse,
}

impl fmt::Display for ChangeGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChangeGranularity::Fine => "fine-grained",
            ChangeGranularity::Medium => "medium-grained",
            ChangeGranularity::Coarse => "coarse-grained",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceStatus {
    Active,
    Occasional,
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MaintenanceStatus::Active => "actively maintained",
            MaintenanceStatus::Occasional => "occasionally maintained",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryProfile {
    pub change_granularity: Option<ChangeGranularity>,
    /// Contributors per commit.
    pub newcomer_friendliness: Option<Level>,
    /// Share of commits whose message matched a keyword category.
    pub keyword_convention: Option<Level>,
    /// Share of `test` commits.
    pub test_attention: Option<Level>,
    pub maintenance: MaintenanceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayCount {
    pub day: String,
    pub commits: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourCount {
    pub hour: u32,
    pub commits: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCount {
    pub author: String,
    pub commits: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: MessageCategory,
    pub commits: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStat {
    pub month: String,
    pub commit_count: u64,
    pub distinct_author_count: u64,
    pub lines_added_sum: u64,
    pub lines_deleted_sum: u64,
    pub files_changed_sum: u64,
    pub net_change: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorActivity {
    pub author: String,
    pub commits: u64,
    pub active_days: u64,
    pub commits_per_active_day: f64,
}

/// Headline numbers. `None` means "no data" (empty table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_commits: u64,
    pub distinct_authors: u64,
    pub mean_lines_added: Option<f64>,
    pub mean_lines_deleted: Option<f64>,
    pub mean_files_changed: Option<f64>,
    pub mean_message_length: Option<f64>,
    pub total_files_changed: u64,
    pub busiest_weekday: String,
    pub busiest_hour: u32,
    pub top_author: Option<String>,
    pub core_contributors: u64,
    pub core_commit_share: f64,
    pub workday_share: f64,
    pub activity_score: u32,
    pub dominant_category: Option<MessageCategory>,
    pub mean_commits_per_month: Option<f64>,
    /// Mean lines added plus deleted per commit.
    pub mean_change_size: Option<f64>,
    pub profile: RepositoryProfile,
    pub first_commit: Option<NaiveDateTime>,
    pub last_commit: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub weekday_counts: Vec<WeekdayCount>,
    pub hour_counts: Vec<HourCount>,
    pub author_counts: Vec<AuthorCount>,
    pub message_category_counts: Vec<CategoryCount>,
    pub monthly_stats: Vec<MonthlyStat>,
    pub author_activity: Vec<AuthorActivity>,
    pub summary: SummaryMetrics,
}

impl AnalysisResult {
    pub fn weekday(&self, day: &str) -> u64 {
        self.weekday_counts
            .iter()
            .find(|w| w.day == day)
            .map(|w| w.commits)
            .unwrap_or(0)
    }

    pub fn hour(&self, hour: u32) -> u64 {
        self.hour_counts
            .iter()
            .find(|h| h.hour == hour)
            .map(|h| h.commits)
            .unwrap_or(0)
    }

    pub fn author(&self, author: &str) -> u64 {
        self.author_counts
            .iter()
            .find(|a| a.author == author)
            .map(|a| a.commits)
            .unwrap_or(0)
    }

    pub fn category(&self, category: MessageCategory) -> u64 {
        self.message_category_counts
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.commits)
            .unwrap_or(0)
    }

    /// The `n` most active authors plus a remainder bucket when it is non-empty.
    pub fn top_authors(&self, n: usize) -> Vec<AuthorCount> {
        let mut view: Vec<AuthorCount> = self.author_counts.iter().take(n).cloned().collect();
        let rest: u64 = self.author_counts.iter().skip(n).map(|a| a.commits).sum();
        if rest > 0 {
            view.push(AuthorCount {
                author: OTHER_AUTHORS_LABEL.to_string(),
                commits: rest,
            });
        }
        view
    }

    pub fn pie_slices(&self) -> Vec<&CategoryCount> {
        self.message_category_counts
            .iter()
            .filter(|c| c.commits > 0)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub normalization: NormalizeReport,
    pub analysis: AnalysisResult,
}
