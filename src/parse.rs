//! Parser for `git log --format=%H|%an|%ad|%s --date=iso --numstat` output.

use crate::model::{CommitRecord, MESSAGE_MAX_CHARS, SHORT_HASH_LEN};
use crate::util::truncate_chars;
use tracing::debug;

/// Line counters gathered while parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub headers: usize,
    pub file_lines: usize,
    pub skipped_lines: usize,
}

#[derive(Debug, Clone, Copy)]
struct FileChange {
    added: u64,
    deleted: u64,
}

struct Accum {
    hash: String,
    author: String,
    timestamp: String,
    message: String,
}

impl Accum {
    fn from_header(fields: &[&str]) -> Self {
        Self {
            hash: fields[0].to_string(),
            author: fields[1].to_string(),
            timestamp: strip_numeric_offset(fields[2]).to_string(),
            message: truncate_chars(&fields[3..].join("|"), MESSAGE_MAX_CHARS),
        }
    }

    fn close(self, changes: &[FileChange]) -> CommitRecord {
        CommitRecord {
            short_hash: self.hash.chars().take(SHORT_HASH_LEN).collect(),
            hash: self.hash,
            author: self.author,
            timestamp: self.timestamp,
            message: self.message,
            lines_added: changes.iter().map(|c| c.added).sum(),
            lines_deleted: changes.iter().map(|c| c.deleted).sum(),
            files_changed: changes.len() as u64,
        }
    }
}

pub fn parse_commit_log(raw: &str) -> Vec<CommitRecord> {
    parse_commit_log_with_stats(raw).0
}

pub fn parse_commit_log_with_stats(raw: &str) -> (Vec<CommitRecord>, ParseStats) {
    let mut records = Vec::new();
    let mut stats = ParseStats::default();
    let mut current: Option<Accum> = None;
    let mut pending: Vec<FileChange> = Vec::new();

    for line in raw.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        if let Some(fields) = header_fields(line) {
            if let Some(open) = current.take() {
                records.push(open.close(&pending));
            }
            pending.clear();
            current = Some(Accum::from_header(&fields));
            stats.headers += 1;
        } else if line.contains('\t') {
            match parse_file_change(line) {
                Some(change) if current.is_some() => {
                    pending.push(change);
                    stats.file_lines += 1;
                }
                _ => {
                    debug!(line, "skipping malformed numstat line");
                    stats.skipped_lines += 1;
                }
            }
        } else {
            debug!(line, "skipping unrecognized log line");
            stats.skipped_lines += 1;
        }
    }

    if let Some(open) = current.take() {
        records.push(open.close(&pending));
    }

    (records, stats)
}

fn header_fields(line: &str) -> Option<Vec<&str>> {
    if !line.contains('|') || line.contains('\t') {
        return None;
    }
    let fields: Vec<&str> = line.trim().split('|').collect();
    (fields.len() >= 4).then_some(fields)
}

fn parse_file_change(line: &str) -> Option<FileChange> {
    let parts: Vec<&str> = line.trim().split('\t').collect();
    if parts.len() != 3 {
        return None;
    }
    if parts[0] == "-" || parts[1] == "-" {
        return Some(FileChange { added: 0, deleted: 0 });
    }
    Some(FileChange {
        added: parts[0].parse().unwrap_or(0),
        deleted: parts[1].parse().unwrap_or(0),
    })
}

/// Drops a trailing ` +HHMM` / ` -HHMM` zone from a git `--date=iso` value.
fn strip_numeric_offset(date: &str) -> &str {
    let date = date.trim();
    if let Some((base, zone)) = date.rsplit_once(' ') {
        let digits = zone.strip_prefix('+').or_else(|| zone.strip_prefix('-'));
        if digits.is_some_and(|d| d.len() == 4 && d.bytes().all(|b| b.is_ascii_digit())) {
            return base.trim_end();
        }
    }
    date
}
