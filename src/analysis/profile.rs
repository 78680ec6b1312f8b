//! Qualitative labels derived from the summary numbers. Ratios are compared
//! with integer cross-multiplication so boundary values are exact.

use crate::model::{ChangeGranularity, Level, MaintenanceStatus, MessageCategory, RepositoryProfile};

/// Mean change below this many lines is fine-grained.
pub const FINE_CHANGE_LINES: f64 = 50.0;
/// Mean change below this many lines (and not fine) is medium-grained.
pub const MEDIUM_CHANGE_LINES: f64 = 200.0;
/// Commit count above which a repository counts as actively maintained.
pub const ACTIVE_MAINTENANCE_COMMITS: u64 = 100;

pub fn change_granularity(mean_change: f64) -> ChangeGranularity {
    if mean_change < FINE_CHANGE_LINES {
        ChangeGranularity::Fine
    } else if mean_change < MEDIUM_CHANGE_LINES {
        ChangeGranularity::Medium
    } else {
        ChangeGranularity::Coarse
    }
}

/// High above 1 author per 10 commits, medium above 1 per 20.
pub fn newcomer_friendliness(authors: u64, commits: u64) -> Option<Level> {
    if commits == 0 {
        return None;
    }
    Some(if authors * 10 > commits {
        Level::High
    } else if authors * 20 > commits {
        Level::Medium
    } else {
        Level::Low
    })
}

/// High when more than 70% of commits matched a keyword category.
pub fn keyword_convention(matched: u64, commits: u64) -> Option<Level> {
    if commits == 0 {
        return None;
    }
    Some(if matched * 10 > commits * 7 {
        Level::High
    } else {
        Level::Medium
    })
}

/// High above 10% test commits, medium above 5%.
pub fn test_attention(test_commits: u64, commits: u64) -> Option<Level> {
    if commits == 0 {
        return None;
    }
    Some(if test_commits * 10 > commits {
        Level::High
    } else if test_commits * 20 > commits {
        Level::Medium
    } else {
        Level::Low
    })
}

pub fn maintenance_status(commits: u64) -> MaintenanceStatus {
    if commits > ACTIVE_MAINTENANCE_COMMITS {
        MaintenanceStatus::Active
    } else {
        MaintenanceStatus::Occasional
    }
}

pub fn profile(
    commits: u64,
    authors: u64,
    mean_change: Option<f64>,
    category_counts: &[(MessageCategory, u64)],
) -> RepositoryProfile {
    let matched: u64 = category_counts
        .iter()
        .filter(|(c, _)| *c != MessageCategory::Other)
        .map(|(_, n)| n)
        .sum();
    let tests = category_counts
        .iter()
        .find(|(c, _)| *c == MessageCategory::Test)
        .map(|(_, n)| *n)
        .unwrap_or(0);

    RepositoryProfile {
        change_granularity: mean_change.map(change_granularity),
        newcomer_friendliness: newcomer_friendliness(authors, commits),
        keyword_convention: keyword_convention(matched, commits),
        test_attention: test_attention(tests, commits),
        maintenance: maintenance_status(commits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularity_thresholds() {
        assert_eq!(change_granularity(0.0), ChangeGranularity::Fine);
        assert_eq!(change_granularity(49.9), ChangeGranularity::Fine);
        assert_eq!(change_granularity(50.0), ChangeGranularity::Medium);
        assert_eq!(change_granularity(199.9), ChangeGranularity::Medium);
        assert_eq!(change_granularity(200.0), ChangeGranularity::Coarse);
    }

    #[test]
    fn newcomer_friendliness_thresholds() {
        assert_eq!(newcomer_friendliness(11, 100), Some(Level::High));
        assert_eq!(newcomer_friendliness(10, 100), Some(Level::Medium));
        assert_eq!(newcomer_friendliness(6, 100), Some(Level::Medium));
        assert_eq!(newcomer_friendliness(5, 100), Some(Level::Low));
        assert_eq!(newcomer_friendliness(0, 0), None);
    }

    #[test]
    fn keyword_convention_threshold() {
        assert_eq!(keyword_convention(71, 100), Some(Level::High));
        assert_eq!(keyword_convention(70, 100), Some(Level::Medium));
        assert_eq!(keyword_convention(0, 3), Some(Level::Medium));
        assert_eq!(keyword_convention(0, 0), None);
    }

    #[test]
    fn test_attention_thresholds() {
        assert_eq!(test_attention(11, 100), Some(Level::High));
        assert_eq!(test_attention(10, 100), Some(Level::Medium));
        assert_eq!(test_attention(6, 100), Some(Level::Medium));
        assert_eq!(test_attention(5, 100), Some(Level::Low));
        assert_eq!(test_attention(0, 0), None);
    }

    #[test]
    fn maintenance_threshold() {
        assert_eq!(maintenance_status(100), MaintenanceStatus::Occasional);
        assert_eq!(maintenance_status(101), MaintenanceStatus::Active);
    }

    #[test]
    fn profile_ignores_other_for_convention() {
        let counts = [
            (MessageCategory::Fix, 2),
            (MessageCategory::Test, 1),
            (MessageCategory::Other, 1),
        ];
        let p = profile(4, 1, Some(60.0), &counts);
        assert_eq!(p.keyword_convention, Some(Level::High));
        assert_eq!(p.test_attention, Some(Level::High));
        assert_eq!(p.newcomer_friendliness, Some(Level::High));
        assert_eq!(p.change_granularity, Some(ChangeGranularity::Medium));
        assert_eq!(p.maintenance, MaintenanceStatus::Occasional);
    }

    #[test]
    fn empty_profile_has_no_labels() {
        let p = profile(0, 0, None, &[]);
        assert_eq!(p.change_granularity, None);
        assert_eq!(p.newcomer_friendliness, None);
        assert_eq!(p.keyword_convention, None);
        assert_eq!(p.test_attention, None);
        assert_eq!(p.maintenance, MaintenanceStatus::Occasional);
    }
}
