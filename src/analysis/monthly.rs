use crate::model::{AuthorActivity, AuthorCount, MonthlyStat, NormalizedCommit};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Default)]
struct MonthAccum<'a> {
    commits: u64,
    authors: HashSet<&'a str>,
    added: u64,
    deleted: u64,
    files: u64,
}

/// One entry per month present in `rows`, oldest first.
pub fn monthly_stats(rows: &[NormalizedCommit]) -> Vec<MonthlyStat> {
    let mut months: BTreeMap<&str, MonthAccum> = BTreeMap::new();
    for row in rows {
        let entry = months.entry(row.month.as_str()).or_default();
        entry.commits += 1;
        if !row.author.trim().is_empty() {
            entry.authors.insert(row.author.as_str());
        }
        entry.added += row.lines_added;
        entry.deleted += row.lines_deleted;
        entry.files += row.files_changed;
    }

    months
        .into_iter()
        .map(|(month, acc)| MonthlyStat {
            month: month.to_string(),
            commit_count: acc.commits,
            distinct_author_count: acc.authors.len() as u64,
            lines_added_sum: acc.added,
            lines_deleted_sum: acc.deleted,
            files_changed_sum: acc.files,
            net_change: acc.added as i64 - acc.deleted as i64,
        })
        .collect()
}

/// Per-author activity, following the order of `ranking`.
pub fn author_activity(rows: &[NormalizedCommit], ranking: &[AuthorCount]) -> Vec<AuthorActivity> {
    let mut days: HashMap<&str, HashSet<chrono::NaiveDate>> = HashMap::new();
    for row in rows {
        days.entry(row.author.as_str()).or_default().insert(row.date_only);
    }

    ranking
        .iter()
        .map(|a| {
            let active_days = days.get(a.author.as_str()).map_or(0, |d| d.len()) as u64;
            AuthorActivity {
                author: a.author.clone(),
                commits: a.commits,
                active_days,
                commits_per_active_day: a.commits as f64 / active_days.max(1) as f64,
            }
        })
        .collect()
}
