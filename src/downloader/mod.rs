pub mod batch;
pub mod output_parser;
pub mod probe;
pub mod ytdlp;

use std::path::PathBuf;

use crate::errors::Result;
use probe::VideoInfo;

/// One URL to fetch into an output directory
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub output_dir: PathBuf,
}

/// Result of one download attempt. Every request gets exactly one.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadOutcome {
    Success { url: String, destination: PathBuf },
    Failure { url: String, reason: String },
}

/// The external download capability.
///
/// `YtDlp` runs the real tool; tests plug in their own.
pub trait Fetcher {
    /// Downloads `request.url` into `request.output_dir` and returns the file written
    fn fetch(&self, request: &DownloadRequest) -> Result<PathBuf>;

    /// Reads video metadata and available formats without downloading
    fn probe(&self, url: &str) -> Result<VideoInfo>;
}
