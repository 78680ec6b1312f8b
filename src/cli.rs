use crate::config::{AnalysisOptions, CollectOptions, DEFAULT_TOP_AUTHORS};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_COMMIT_TABLE: &str = "data/processed/commits.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "results/analysis";

#[derive(Parser)]
#[command(name = "gitpulse")]
#[command(about = "Collect git commit history and report on commit patterns")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, short, global = true, help = "Log progress at info level (overridden by RUST_LOG)")]
    pub verbose: bool,
}

/// Where the commit log comes from and where the commit table goes.
#[derive(Args, Clone)]
pub struct SourceArgs {
    #[arg(long, help = "Path to git repository (defaults to the current directory)")]
    pub repo: Option<PathBuf>,

    #[arg(long, conflicts_with = "repo", help = "Read a saved `git log --numstat` dump instead of a repository")]
    pub log_file: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_COMMIT_TABLE, help = "Commit table to write")]
    pub output: PathBuf,

    #[arg(long, help = "Only collect the N most recent commits")]
    pub max_commits: Option<usize>,

    #[arg(long, help = "Only commits more recent than this date (any format git accepts)")]
    pub since: Option<String>,

    #[arg(long, help = "Only commits older than this date (any format git accepts)")]
    pub until: Option<String>,

    #[arg(long, help = "Skip merge commits")]
    pub no_merges: bool,
}

impl SourceArgs {
    pub fn collect_options(&self) -> CollectOptions {
        let mut options = CollectOptions::new().with_merges(!self.no_merges);
        if let Some(n) = self.max_commits {
            options = options.with_max_commits(n);
        }
        if let Some(since) = &self.since {
            options = options.with_since(since.clone());
        }
        if let Some(until) = &self.until {
            options = options.with_until(until.clone());
        }
        options
    }
}

#[derive(Args, Clone)]
pub struct RenderArgs {
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR, help = "Directory for report files")]
    pub output_dir: PathBuf,

    #[arg(long, default_value_t = DEFAULT_TOP_AUTHORS, help = "Authors shown before the remainder bucket")]
    pub top_authors: usize,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,

    #[arg(long, conflicts_with = "json", help = "Output monthly stats as NDJSON")]
    pub ndjson: bool,

    #[arg(long, short, help = "Only write files, print nothing")]
    pub quiet: bool,
}

impl RenderArgs {
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions::new().with_top_authors(self.top_authors)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse the commit log and write the commit table
    Collect {
        #[clap(flatten)]
        source: SourceArgs,

        #[arg(long, short, help = "Hide the progress spinner")]
        quiet: bool,
    },
    /// Normalize a commit table, aggregate it and write the report
    Analyze {
        #[arg(long, default_value = DEFAULT_COMMIT_TABLE, help = "Commit table to read")]
        input: PathBuf,

        #[clap(flatten)]
        render: RenderArgs,
    },
    /// Collect, then analyze the table just written
    Run {
        #[clap(flatten)]
        source: SourceArgs,

        #[clap(flatten)]
        render: RenderArgs,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Collect { source, quiet } => crate::collect::exec(&source, quiet).map(|_| ()),
            Commands::Analyze { input, render } => crate::analyze::exec(&input, &render),
            Commands::Run { source, render } => {
                let quiet = render.quiet || render.json || render.ndjson;
                let table = crate::collect::exec(&source, quiet)?;
                crate::analyze::exec(&table, &render)
            }
        }
    }
}
