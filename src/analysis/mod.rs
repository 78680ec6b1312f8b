pub mod category;
pub mod distribution;
pub mod monthly;
pub mod profile;

pub use category::{classify, count_categories};
pub use distribution::{busiest_hour, busiest_weekday, hour_counts, weekday_counts, workday_share};
pub use monthly::{author_activity, monthly_stats};
pub use profile::profile;

use crate::config::AnalysisOptions;
use crate::model::{AnalysisResult, MessageCategory, NormalizedTable, SummaryMetrics};
use crate::normalize::rank_authors;
use crate::util::{mean, percentage};
use std::collections::HashSet;
use tracing::info;

pub fn aggregate(table: &NormalizedTable, options: &AnalysisOptions) -> AnalysisResult {
    let rows = &table.rows;
    let total = rows.len() as u64;

    let weekday_counts = weekday_counts(rows);
    let hour_counts = hour_counts(rows);
    let author_counts = rank_authors(rows.iter().map(|r| r.author.as_str()));
    let message_category_counts = count_categories(rows.iter().map(|r| r.message.as_str()));
    let monthly_stats = monthly_stats(rows);
    let author_activity = author_activity(rows, &author_counts);

    let core: HashSet<&str> = rows
        .iter()
        .filter(|r| r.is_core)
        .map(|r| r.author.as_str())
        .collect();
    let core_commits = rows.iter().filter(|r| r.is_core).count();

    let activity_score = if options.activity_baseline == 0 {
        0
    } else {
        (total * 100 / options.activity_baseline).min(100) as u32
    };

    let dominant_category = if total == 0 {
        None
    } else {
        message_category_counts
            .iter()
            .fold(None::<(MessageCategory, u64)>, |best, c| match best {
                Some((_, n)) if n >= c.commits => best,
                _ => Some((c.category, c.commits)),
            })
            .map(|(category, _)| category)
    };

    let mean_change_size = mean(rows.iter().map(|r| (r.lines_added + r.lines_deleted) as f64));
    let category_totals: Vec<(MessageCategory, u64)> = message_category_counts
        .iter()
        .map(|c| (c.category, c.commits))
        .collect();
    let profile = profile(total, author_counts.len() as u64, mean_change_size, &category_totals);

    let summary = SummaryMetrics {
        total_commits: total,
        distinct_authors: author_counts.len() as u64,
        mean_lines_added: mean(rows.iter().map(|r| r.lines_added as f64)),
        mean_lines_deleted: mean(rows.iter().map(|r| r.lines_deleted as f64)),
        mean_files_changed: mean(rows.iter().map(|r| r.files_changed as f64)),
        mean_message_length: mean(rows.iter().map(|r| r.message.chars().count() as f64)),
        total_files_changed: rows.iter().map(|r| r.files_changed).sum(),
        busiest_weekday: busiest_weekday(&weekday_counts),
        busiest_hour: busiest_hour(&hour_counts),
        top_author: author_counts.first().map(|a| a.author.clone()),
        core_contributors: core.len() as u64,
        core_commit_share: percentage(core_commits as f64, total as f64),
        workday_share: workday_share(&weekday_counts, total),
        activity_score,
        dominant_category,
        mean_commits_per_month: mean(monthly_stats.iter().map(|m| m.commit_count as f64)),
        mean_change_size,
        profile,
        first_commit: rows.iter().map(|r| r.timestamp).min(),
        last_commit: rows.iter().map(|r| r.timestamp).max(),
    };

    info!(
        commits = total,
        authors = summary.distinct_authors,
        months = monthly_stats.len(),
        "aggregated commit table"
    );

    AnalysisResult {
        weekday_counts,
        hour_counts,
        author_counts,
        message_category_counts,
        monthly_stats,
        author_activity,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuthorCount, ChangeGranularity, Level, MaintenanceStatus, OTHER_AUTHORS_LABEL};
    use crate::normalize::normalize;
    use crate::table::RawTable;
    use pretty_assertions::assert_eq;

    fn normalized(rows: &[(&str, &str, &str, u64, u64)]) -> NormalizedTable {
        let raw = RawTable::new(
            ["commit_hash", "author", "date", "message", "lines_added", "lines_deleted"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows.iter()
                .enumerate()
                .map(|(i, (author, date, message, added, deleted))| {
                    vec![
                        format!("{i:07}"),
                        author.to_string(),
                        date.to_string(),
                        message.to_string(),
                        added.to_string(),
                        deleted.to_string(),
                    ]
                })
                .collect(),
        );
        normalize(&raw).unwrap().table
    }

    fn three_commits() -> NormalizedTable {
        normalized(&[
            ("A", "2025-01-11 10:30", "Fix bug", 5, 2),
            ("B", "2025-01-12 14:45", "Add feature", 10, 3),
            ("C", "2025-01-13 09:15", "Update docs", 2, 1),
        ])
    }

    #[test]
    fn three_commit_example() {
        let result = aggregate(&three_commits(), &AnalysisOptions::default());
        assert_eq!(result.weekday("Saturday"), 1);
        assert_eq!(result.weekday("Sunday"), 1);
        assert_eq!(result.weekday("Monday"), 1);
        for day in ["Tuesday", "Wednesday", "Thursday", "Friday"] {
            assert_eq!(result.weekday(day), 0);
        }
        assert_eq!(
            result.author_counts,
            vec![
                AuthorCount { author: "A".into(), commits: 1 },
                AuthorCount { author: "B".into(), commits: 1 },
                AuthorCount { author: "C".into(), commits: 1 },
            ]
        );
        assert_eq!(result.summary.total_commits, 3);
        assert_eq!(result.summary.top_author.as_deref(), Some("A"));
        assert_eq!(result.summary.busiest_weekday, "Monday");
        assert_eq!(result.summary.busiest_hour, 9);
    }

    #[test]
    fn summary_means_and_core_share() {
        let result = aggregate(&three_commits(), &AnalysisOptions::default());
        let s = &result.summary;
        assert_eq!(s.mean_lines_added, Some(17.0 / 3.0));
        assert_eq!(s.mean_lines_deleted, Some(2.0));
        assert_eq!(s.core_contributors, 1);
        assert!((s.core_commit_share - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(s.activity_score, 1);
        assert_eq!(s.total_files_changed, 3);
    }

    #[test]
    fn fixed_size_distributions() {
        let result = aggregate(&three_commits(), &AnalysisOptions::default());
        assert_eq!(result.weekday_counts.len(), 7);
        assert_eq!(result.hour_counts.len(), 24);
        assert_eq!(result.hour(10), 1);
        assert_eq!(result.hour(11), 0);
    }

    #[test]
    fn categories_use_first_match() {
        let result = aggregate(&three_commits(), &AnalysisOptions::default());
        assert_eq!(result.category(MessageCategory::Fix), 1);
        assert_eq!(result.category(MessageCategory::Feature), 1);
        assert_eq!(result.category(MessageCategory::Other), 1);
        assert_eq!(result.message_category_counts.len(), 8);
        assert_eq!(result.pie_slices().len(), 3);
    }

    #[test]
    fn monthly_stats_are_chronological() {
        let table = normalized(&[
            ("A", "2025-03-02 10:00:00", "x", 5, 9),
            ("B", "2024-12-30 10:00:00", "x", 1, 0),
            ("A", "2025-03-20 10:00:00", "x", 2, 0),
            ("C", "2025-01-05 10:00:00", "x", 0, 0),
        ]);
        let result = aggregate(&table, &AnalysisOptions::default());
        let months: Vec<&str> = result.monthly_stats.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2024-12", "2025-01", "2025-03"]);
        let march = &result.monthly_stats[2];
        assert_eq!(march.commit_count, 2);
        assert_eq!(march.distinct_author_count, 1);
        assert_eq!(march.lines_added_sum, 7);
        assert_eq!(march.net_change, -2);
        assert_eq!(result.summary.mean_commits_per_month, Some(4.0 / 3.0));
    }

    #[test]
    fn top_author_view_buckets_the_rest() {
        let rows: Vec<(String, &str)> = (0..20)
            .map(|i| (format!("dev{i:02}"), "2025-01-01 12:00:00"))
            .collect();
        let commits: Vec<(&str, &str, &str, u64, u64)> = rows
            .iter()
            .map(|(a, d)| (a.as_str(), *d, "x", 0, 0))
            .collect();
        let result = aggregate(&normalized(&commits), &AnalysisOptions::default());

        let view = result.top_authors(15);
        assert_eq!(view.len(), 16);
        assert_eq!(view[15].author, OTHER_AUTHORS_LABEL);
        assert_eq!(view[15].commits, 5);
        assert_eq!(result.top_authors(20).len(), 20);
        assert_eq!(result.author_counts.len(), 20);
    }

    /// 20 commits: 2 `test`, 12 `fix`, 6 unmatched, 50 changed lines each.
    fn boundary_commits(authors: &[&'static str]) -> NormalizedTable {
        let rows: Vec<(&str, &str, &str, u64, u64)> = (0..20)
            .map(|i| {
                let message = match i {
                    0 | 1 => "test coverage for parser",
                    2..=13 => "fix crash",
                    _ => "update",
                };
                (authors[i % authors.len()], "2025-01-01 12:00:00", message, 30, 20)
            })
            .collect();
        normalized(&rows)
    }

    #[test]
    fn profile_labels_at_thresholds() {
        let result = aggregate(&boundary_commits(&["A", "B"]), &AnalysisOptions::default());
        let s = &result.summary;
        assert_eq!(s.mean_change_size, Some(50.0));
        assert_eq!(s.profile.change_granularity, Some(ChangeGranularity::Medium));
        // 2 authors / 20 commits is exactly 0.1
        assert_eq!(s.profile.newcomer_friendliness, Some(Level::Medium));
        // 14 matched / 20 is exactly 0.7
        assert_eq!(s.profile.keyword_convention, Some(Level::Medium));
        // 2 tests / 20 is exactly 0.1
        assert_eq!(s.profile.test_attention, Some(Level::Medium));
        assert_eq!(s.profile.maintenance, MaintenanceStatus::Occasional);

        let result = aggregate(&boundary_commits(&["A", "B", "C"]), &AnalysisOptions::default());
        assert_eq!(result.summary.profile.newcomer_friendliness, Some(Level::High));

        let result = aggregate(&boundary_commits(&["A"]), &AnalysisOptions::default());
        assert_eq!(result.summary.profile.newcomer_friendliness, Some(Level::Low));
    }

    #[test]
    fn empty_table_reports_no_data() {
        let result = aggregate(&NormalizedTable::default(), &AnalysisOptions::default());
        let s = &result.summary;
        assert_eq!(s.total_commits, 0);
        assert_eq!(s.mean_lines_added, None);
        assert_eq!(s.mean_lines_deleted, None);
        assert_eq!(s.core_commit_share, 0.0);
        assert_eq!(s.workday_share, 0.0);
        assert_eq!(s.top_author, None);
        assert_eq!(s.dominant_category, None);
        assert_eq!(s.busiest_weekday, "Monday");
        assert_eq!(s.busiest_hour, 0);
        assert_eq!(result.weekday_counts.len(), 7);
        assert_eq!(result.hour_counts.len(), 24);
        assert!(result.monthly_stats.is_empty());
        assert_eq!(s.mean_change_size, None);
        assert_eq!(s.profile.change_granularity, None);
        assert_eq!(s.profile.newcomer_friendliness, None);
        assert_eq!(s.profile.test_attention, None);
    }

    #[test]
    fn author_activity_counts_distinct_days() {
        let table = normalized(&[
            ("A", "2025-01-01 09:00:00", "x", 0, 0),
            ("A", "2025-01-01 18:00:00", "x", 0, 0),
            ("A", "2025-01-02 09:00:00", "x", 0, 0),
            ("B", "2025-01-02 09:00:00", "x", 0, 0),
        ]);
        let result = aggregate(&table, &AnalysisOptions::default());
        let a = &result.author_activity[0];
        assert_eq!((a.author.as_str(), a.commits, a.active_days), ("A", 3, 2));
        assert_eq!(a.commits_per_active_day, 1.5);
    }
}
