use std::path::PathBuf;

pub const DEFAULT_TOP_AUTHORS: usize = 15;

/// Commit count at which the activity score saturates at 100.
pub const DEFAULT_ACTIVITY_BASELINE: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub top_authors: usize,
    pub activity_baseline: u64,
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self {
            top_authors: DEFAULT_TOP_AUTHORS,
            activity_baseline: DEFAULT_ACTIVITY_BASELINE,
        }
    }

    pub fn with_top_authors(mut self, n: usize) -> Self {
        self.top_authors = n;
        self
    }

    pub fn with_activity_baseline(mut self, commits: u64) -> Self {
        self.activity_baseline = commits;
        self
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Arguments forwarded to `git log`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectOptions {
    pub max_commits: Option<usize>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub include_merges: bool,
}

impl CollectOptions {
    pub fn new() -> Self {
        Self {
            include_merges: true,
            ..Default::default()
        }
    }

    pub fn with_max_commits(mut self, n: usize) -> Self {
        self.max_commits = Some(n);
        self
    }

    pub fn with_since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    pub fn with_until(mut self, until: impl Into<String>) -> Self {
        self.until = Some(until.into());
        self
    }

    pub fn with_merges(mut self, include: bool) -> Self {
        self.include_merges = include;
        self
    }

    pub fn git_log_args(&self) -> Vec<String> {
        let mut args = vec![
            "log".to_string(),
            "--format=%H|%an|%ad|%s".to_string(),
            "--date=iso".to_string(),
            "--numstat".to_string(),
            "--no-renames".to_string(),
        ];
        if let Some(n) = self.max_commits {
            args.push("-n".to_string());
            args.push(n.to_string());
        }
        if let Some(since) = &self.since {
            args.push(format!("--since={since}"));
        }
        if let Some(until) = &self.until {
            args.push(format!("--until={until}"));
        }
        if !self.include_merges {
            args.push("--no-merges".to_string());
        }
        args
    }
}

/// Files written by an analysis run, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub dir: PathBuf,
}

impl OutputLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn processed_data(&self) -> PathBuf {
        self.dir.join("processed_data.csv")
    }

    pub fn analysis_json(&self) -> PathBuf {
        self.dir.join("analysis.json")
    }

    pub fn report(&self) -> PathBuf {
        self.dir.join("analysis_report.md")
    }

    pub fn summary(&self) -> PathBuf {
        self.dir.join("summary.txt")
    }
}
