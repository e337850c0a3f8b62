//! Parser for yt-dlp console output.
//!
//! Classifies each line yt-dlp prints with `--newline` and tracks where the
//! final file ended up, since yt-dlp only reports that in passing.

use std::path::PathBuf;

/// Represents a parsed line from yt-dlp output
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedOutput {
    /// Progress update with download information
    Progress(ProgressInfo),
    /// Streams being merged into the given file
    Merge(String),
    /// Other post-processing status (ffmpeg fixups, conversions)
    PostProcess(String),
    /// File a stream is being written to
    Destination(String),
    /// File already present on disk
    AlreadyDownloaded(String),
    /// Error message
    Error(String),
    /// Other informational output
    Info(String),
    /// Noise that should not be logged
    Ignore,
}

/// Progress information extracted from a `[download]` line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressInfo {
    /// Download percentage (0.0 - 100.0)
    pub percent: f64,
    /// Download speed string (e.g., "1.5MiB/s")
    pub speed: Option<String>,
    /// ETA string (e.g., "00:05:23")
    pub eta: Option<String>,
    /// Total bytes, when yt-dlp knows the size
    pub total_bytes: Option<u64>,
}

/// Parses a line of yt-dlp output
pub fn parse_ytdlp_line(line: &str) -> ParsedOutput {
    let line = line.trim();

    if line.is_empty() {
        return ParsedOutput::Ignore;
    }

    if line.starts_with("[Merger]") {
        return match quoted_path(line) {
            Some(path) => ParsedOutput::Merge(path),
            None => ParsedOutput::PostProcess(line.to_string()),
        };
    }

    if line.starts_with("[download]") {
        return parse_download_line(line);
    }

    if line.starts_with("[ffmpeg]") || line.starts_with("[Fixup") {
        return ParsedOutput::PostProcess(line.to_string());
    }

    if line.contains("ERROR") {
        return ParsedOutput::Error(line.to_string());
    }

    if line.starts_with("[youtube]")
        || line.starts_with("[info]")
        || line.starts_with("[debug]")
        || line.starts_with("[generic]")
    {
        return ParsedOutput::Ignore;
    }

    ParsedOutput::Info(line.to_string())
}

/// Parses `[download] ...` lines
fn parse_download_line(line: &str) -> ParsedOutput {
    let rest = line.trim_start_matches("[download]").trim();

    if let Some(path) = rest.strip_prefix("Destination:") {
        return ParsedOutput::Destination(path.trim().to_string());
    }

    if let Some(path) = rest.strip_suffix("has already been downloaded") {
        return ParsedOutput::AlreadyDownloaded(path.trim().to_string());
    }

    if let Some(progress) = parse_progress(rest) {
        return ParsedOutput::Progress(progress);
    }

    ParsedOutput::Info(line.to_string())
}

/// Parses percentage lines like `45.2% of 100.00MiB at 1.50MiB/s ETA 00:35`
fn parse_progress(rest: &str) -> Option<ProgressInfo> {
    let percent_end = rest.find('%')?;
    let percent: f64 = rest[..percent_end].trim().parse().ok()?;

    let mut info = ProgressInfo {
        percent,
        ..Default::default()
    };

    if let Some(at_idx) = rest.find(" at ") {
        let speed = rest[at_idx + 4..].split_whitespace().next();
        info.speed = speed.filter(|s| *s != "Unknown").map(String::from);
    }

    if let Some(eta_idx) = rest.find("ETA ") {
        let eta = rest[eta_idx + 4..].trim();
        if !eta.is_empty() && eta != "Unknown" {
            info.eta = Some(eta.to_string());
        }
    }

    if let Some(of_idx) = rest.find(" of ") {
        let size = rest[of_idx + 4..].split_whitespace().next().unwrap_or("");
        info.total_bytes = parse_size_string(size.trim_start_matches('~'));
    }

    Some(info)
}

/// Extracts the path from `[Merger] Merging formats into "path"`
fn quoted_path(line: &str) -> Option<String> {
    let start = line.find('"')? + 1;
    let end = line.rfind('"')?;
    (end > start).then(|| line[start..end].to_string())
}

/// Parses a size string like "100.50MiB" to bytes
fn parse_size_string(s: &str) -> Option<u64> {
    let s = s.trim();

    let num_end = s
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(s.len());
    let num: f64 = s[..num_end].parse().ok()?;

    let multiplier: f64 = match s[num_end..].to_lowercase().as_str() {
        "b" | "" => 1.0,
        "kib" | "kb" | "k" => 1024.0,
        "mib" | "mb" | "m" => 1024.0 * 1024.0,
        "gib" | "gb" | "g" => 1024.0 * 1024.0 * 1024.0,
        _ => return None,
    };

    Some((num * multiplier) as u64)
}

/// Accumulates what a yt-dlp run said about its result
#[derive(Debug, Default)]
pub struct OutputTracker {
    merged: Option<String>,
    destination: Option<String>,
    existing: Option<String>,
    errors: Vec<String>,
}

impl OutputTracker {
    pub fn record(&mut self, parsed: &ParsedOutput) {
        match parsed {
            ParsedOutput::Merge(path) => self.merged = Some(path.clone()),
            ParsedOutput::Destination(path) => self.destination = Some(path.clone()),
            ParsedOutput::AlreadyDownloaded(path) => self.existing = Some(path.clone()),
            ParsedOutput::Error(msg) => self.errors.push(msg.clone()),
            _ => {}
        }
    }

    /// Final file: the merge target, else the last destination, else the existing file
    pub fn final_path(&self) -> Option<PathBuf> {
        self.merged
            .as_ref()
            .or(self.destination.as_ref())
            .or(self.existing.as_ref())
            .map(PathBuf::from)
    }

    /// Error lines joined into one failure reason
    pub fn error_message(&self) -> Option<String> {
        (!self.errors.is_empty()).then(|| self.errors.join("; "))
    }
}
