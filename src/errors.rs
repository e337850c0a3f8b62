use std::result;
use thiserror::Error;

pub type Result<T> = result::Result<T, AppError>;

/// Errors raised while driving yt-dlp for a single URL
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Download error: {0}")]
    Download(String),

    #[error("Could not read video info: {0}")]
    Probe(String),

    #[error("Invalid JSON from yt-dlp: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Short human-readable reason used on a failure line
    pub fn reason(&self) -> String {
        match self {
            AppError::Download(msg) | AppError::Probe(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
