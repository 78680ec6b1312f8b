use super::LogSource;
use crate::config::CollectOptions;
use crate::error::{GitpulseError, Result};
use gix::discover;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

pub struct GitRepo {
    path: PathBuf,
    head: Option<String>,
    options: CollectOptions,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>, options: CollectOptions) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        let head = repo.head_id().ok().map(|id| id.to_string());
        debug!(path = %path.display(), head = head.as_deref().unwrap_or("unborn"), "opened repository");

        Ok(Self { path, head, options })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn head(&self) -> Option<&str> {
        self.head.as_deref()
    }
}

impl LogSource for GitRepo {
    fn commit_log(&self) -> Result<String> {
        if self.head.is_none() {
            return Err(GitpulseError::GitRepo(format!(
                "{} has no commits",
                self.path.display()
            )));
        }

        let args = self.options.git_log_args();
        info!(path = %self.path.display(), ?args, "running git log");
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.path)
            .args(&args)
            .output()?;

        if !output.status.success() {
            return Err(GitpulseError::GitCommand(format!(
                "git log exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn describe(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}
