use crate::cli::SourceArgs;
use crate::error::GitpulseError;
use crate::git::{GitRepo, LogFile, LogSource};
use crate::parse::parse_commit_log_with_stats;
use crate::table::write_records;
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{info, warn};

/// Writes the commit table and returns its path.
pub fn exec(args: &SourceArgs, quiet: bool) -> anyhow::Result<PathBuf> {
    let source: Box<dyn LogSource> = match &args.log_file {
        Some(path) => Box::new(LogFile::new(path)),
        None => Box::new(
            GitRepo::open(args.repo.as_ref(), args.collect_options())
                .context("Failed to open git repository")?,
        ),
    };

    let pb = if quiet { ProgressBar::hidden() } else { ProgressBar::new_spinner() };
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Reading commit log from {}...", source.describe()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let log = source.commit_log().context("Failed to read commit log")?;
    pb.set_message("Parsing commits...");
    let (records, stats) = parse_commit_log_with_stats(&log);

    if stats.skipped_lines > 0 {
        warn!(skipped = stats.skipped_lines, "ignored malformed log lines");
    }
    if records.is_empty() {
        pb.finish_and_clear();
        return Err(GitpulseError::EmptyLog).with_context(|| format!("Nothing to collect from {}", source.describe()));
    }

    write_records(&args.output, &records)
        .with_context(|| format!("Failed to write commit table {}", args.output.display()))?;
    info!(
        commits = records.len(),
        file_lines = stats.file_lines,
        output = %args.output.display(),
        "collected commits"
    );
    pb.finish_with_message(format!("Collected {} commits into {}", records.len(), args.output.display()));

    Ok(args.output.clone())
}
