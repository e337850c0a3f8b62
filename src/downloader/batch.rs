use std::{
    io::{self, Write},
    path::PathBuf,
};

use tracing::{debug, info, warn};

use super::{DownloadOutcome, DownloadRequest, Fetcher};
use crate::utils::{
    display::{Indicators, detect_platform},
    file::ensure_output_dir,
};

/// What to do with each URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Download,
    /// Print the format table instead of downloading
    ListFormats,
}

impl Mode {
    fn verb(&self) -> &'static str {
        match self {
            Mode::Download => "Downloaded",
            Mode::ListFormats => "Listed formats for",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    pub mode: Mode,
    /// Probe and print title/platform/duration/uploader before each download
    pub show_info: bool,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub attempted: usize,
    pub succeeded: usize,
}

impl BatchSummary {
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }
}

/// Processes `urls` one at a time, in order, writing one outcome line per URL.
///
/// A failing URL is reported and the batch moves on. Only an error writing to
/// `out` stops the run.
pub fn run_batch<F: Fetcher, W: Write>(
    fetcher: &F,
    urls: &[String],
    options: &BatchOptions,
    out: &mut W,
) -> io::Result<BatchSummary> {
    let icons = options.indicators;
    let mut summary = BatchSummary::default();
    let total = urls.len();

    if total > 1 {
        writeln!(out, "Processing {} videos...", total)?;
    }

    for (i, url) in urls.iter().enumerate() {
        if total > 1 {
            writeln!(out)?;
            writeln!(out, "{} Video {}/{}", icons.video, i + 1, total)?;
            writeln!(out, "URL: {}", url)?;
        }
        writeln!(out, "{} Detected platform: {}", icons.platform, detect_platform(url))?;

        let outcome = match options.mode {
            Mode::Download => download_one(fetcher, url, options, out)?,
            Mode::ListFormats => list_formats_one(fetcher, url, out)?,
        };

        summary.attempted += 1;
        match &outcome {
            DownloadOutcome::Success { url, destination } => {
                summary.succeeded += 1;
                info!(url = %url, path = %destination.display(), "finished");
                match options.mode {
                    Mode::Download => writeln!(
                        out,
                        "{} Downloaded {} -> {}",
                        icons.ok,
                        url,
                        destination.display()
                    )?,
                    Mode::ListFormats => writeln!(out, "{} Listed formats for {}", icons.ok, url)?,
                }
            }
            DownloadOutcome::Failure { url, reason } => {
                debug!(url = %url, "failed: {}", reason);
                writeln!(out, "{} Failed {}: {}", icons.fail, url, reason)?;
            }
        }
    }

    if total > 1 {
        writeln!(out)?;
        writeln!(
            out,
            "{} {} {}/{} videos successfully!",
            icons.done,
            options.mode.verb(),
            summary.succeeded,
            total
        )?;
    }

    Ok(summary)
}

fn download_one<F: Fetcher, W: Write>(
    fetcher: &F,
    url: &str,
    options: &BatchOptions,
    out: &mut W,
) -> io::Result<DownloadOutcome> {
    let request = DownloadRequest {
        url: url.to_string(),
        output_dir: options.output_dir.clone(),
    };

    if let Err(err) = ensure_output_dir(&request.output_dir) {
        return Ok(DownloadOutcome::Failure {
            url: request.url,
            reason: err.reason(),
        });
    }

    if options.show_info {
        match fetcher.probe(url) {
            Ok(video) => video.write_summary(out)?,
            Err(err) => warn!(url, "could not read video info: {}", err.reason()),
        }
    }

    writeln!(out, "Downloading in best quality available...")?;
    out.flush()?;

    Ok(match fetcher.fetch(&request) {
        Ok(destination) => DownloadOutcome::Success {
            url: request.url,
            destination,
        },
        Err(err) => DownloadOutcome::Failure {
            url: request.url,
            reason: err.reason(),
        },
    })
}

fn list_formats_one<F: Fetcher, W: Write>(
    fetcher: &F,
    url: &str,
    out: &mut W,
) -> io::Result<DownloadOutcome> {
    Ok(match fetcher.probe(url) {
        Ok(video) => {
            video.write_format_table(out)?;
            DownloadOutcome::Success {
                url: url.to_string(),
                destination: PathBuf::new(),
            }
        }
        Err(err) => DownloadOutcome::Failure {
            url: url.to_string(),
            reason: err.reason(),
        },
    })
}
