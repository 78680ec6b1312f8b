use thiserror::Error;

pub type Result<T> = std::result::Result<T, GitpulseError>;

#[derive(Error, Debug)]
pub enum GitpulseError {
    #[error("Missing required columns: {}", .0.join(", "))]
    Schema(Vec<String>),
    #[error("Unable to read table with any supported encoding ({})", .0.join("; "))]
    Encoding(Vec<String>),
    #[error("Commit log contained no commits")]
    EmptyLog,
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Git command failed: {0}")]
    GitCommand(String),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<gix::discover::Error> for GitpulseError {
    fn from(err: gix::discover::Error) -> Self {
        GitpulseError::GitDiscover(Box::new(err))
    }
}

