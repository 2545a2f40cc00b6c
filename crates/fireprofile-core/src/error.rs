use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid domain pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error(
        "Ambiguous rule: pattern '{pattern}' already routes to profile '{existing}', \
         refusing to also route it to '{requested}'"
    )]
    AmbiguousRule {
        pattern: String,
        existing: String,
        requested: String,
    },

    #[error("Profile '{0}' not found")]
    UnknownProfile(String),

    #[error("Profile '{0}' already exists")]
    DuplicateProfile(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Rule for '{0}' not found")]
    UnknownRule(String),

    #[error("No profiles configured. Run with --config to add one.")]
    NoProfiles,

    #[error("Failed to load config {}: {reason}", path.display())]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("Failed to write config {}: {source}", path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn config_load(path: &std::path::Path, reason: impl ToString) -> Self {
        Error::ConfigLoad {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
