mod repo;

pub use repo::GitRepo;

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Anything that can hand over `hash|author|date|subject` + numstat log text.
pub trait LogSource {
    fn commit_log(&self) -> Result<String>;

    /// Human-readable origin, used in reports.
    fn describe(&self) -> String;
}

/// A log saved earlier with the same `git log` format.
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LogSource for LogFile {
    fn commit_log(&self) -> Result<String> {
        let bytes = fs::read(&self.path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn describe(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}
