use std::{
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
};

use tracing::{debug, info, warn};

use super::{
    DownloadRequest, Fetcher,
    output_parser::{OutputTracker, ParsedOutput, parse_ytdlp_line},
    probe::VideoInfo,
};
use crate::{
    errors::{AppError, Result},
    utils::settings::{FALLBACK_FORMATS, Settings},
};

/// Runs the yt-dlp executable
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    settings: Settings,
    custom_args: Vec<String>,
    fallback: bool,
}

impl YtDlp {
    /// Fails with `AppError::Config` if the configured custom arguments are invalid
    pub fn new(program: impl Into<PathBuf>, settings: Settings, fallback: bool) -> Result<Self> {
        let custom_args = settings.custom_args()?;
        Ok(Self {
            program: program.into(),
            settings,
            custom_args,
            fallback,
        })
    }

    /// Format selectors to try, in order
    fn format_strategies(&self) -> Vec<&str> {
        if self.fallback {
            FALLBACK_FORMATS.to_vec()
        } else {
            vec![self.settings.format_preset.get_format_arg()]
        }
    }

    fn run_download(&self, request: &DownloadRequest, format: &str) -> Result<PathBuf> {
        let cmd_args = build_ytdlp_command_args(
            &self.settings,
            &self.custom_args,
            &request.output_dir,
            format,
            &request.url,
        );
        debug!(program = %self.program.display(), args = ?cmd_args, "spawning yt-dlp");

        let mut child = Command::new(&self.program)
            .args(&cmd_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| AppError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        // Drain stderr on its own thread so the child never blocks on a full pipe
        let stderr = child.stderr.take();
        let stderr_reader = thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut stderr) = stderr {
                // A read error only loses the error text; the exit status still decides
                let _ = stderr.read_to_end(&mut buf);
            }
            String::from_utf8_lossy(&buf).into_owned()
        });

        // Titles are not always UTF-8; split on raw bytes and decode lossily so
        // one odd byte never closes the pipe under a running yt-dlp
        let mut tracker = OutputTracker::default();
        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout)
                .split(b'\n')
                .map_while(std::result::Result::ok)
            {
                let parsed = parse_ytdlp_line(&String::from_utf8_lossy(&line));
                log_parsed(&request.url, &parsed);
                tracker.record(&parsed);
            }
        }

        let status = child.wait()?;
        let stderr_text = stderr_reader.join().unwrap_or_default();
        for line in stderr_text.lines() {
            let parsed = parse_ytdlp_line(line);
            log_parsed(&request.url, &parsed);
            tracker.record(&parsed);
        }

        if !status.success() {
            let reason = tracker.error_message().unwrap_or_else(|| match status.code() {
                Some(code) => format!("yt-dlp exited with status {}", code),
                None => "yt-dlp was terminated by a signal".to_string(),
            });
            return Err(AppError::Download(reason));
        }

        Ok(tracker
            .final_path()
            .unwrap_or_else(|| request.output_dir.clone()))
    }
}

fn log_parsed(url: &str, parsed: &ParsedOutput) {
    match parsed {
        ParsedOutput::Progress(p) => debug!(
            url,
            percent = p.percent,
            speed = p.speed.as_deref().unwrap_or("-"),
            eta = p.eta.as_deref().unwrap_or("-"),
            total_bytes = ?p.total_bytes,
            "progress"
        ),
        ParsedOutput::Merge(path) => info!(url, path = %path, "merging audio and video"),
        ParsedOutput::PostProcess(line) => info!(url, "{}", line),
        ParsedOutput::Destination(path) => debug!(url, path = %path, "writing"),
        ParsedOutput::AlreadyDownloaded(path) => info!(url, path = %path, "already downloaded"),
        ParsedOutput::Error(line) => debug!(url, "{}", line),
        ParsedOutput::Info(line) => debug!(url, "{}", line),
        ParsedOutput::Ignore => {}
    }
}

impl Fetcher for YtDlp {
    fn fetch(&self, request: &DownloadRequest) -> Result<PathBuf> {
        let strategies = self.format_strategies();
        let mut last_err = None;

        for (i, format) in strategies.iter().enumerate() {
            match self.run_download(request, format) {
                Ok(path) => return Ok(path),
                // Nothing to retry with a different format if yt-dlp itself cannot start
                Err(err @ AppError::Spawn { .. }) => return Err(err),
                Err(err) => {
                    if strategies.len() > 1 {
                        warn!(
                            url = %request.url,
                            strategy = i + 1,
                            format = %format,
                            "format strategy failed: {}",
                            err.reason()
                        );
                    }
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| AppError::Download("no format strategy to try".into())))
    }

    fn probe(&self, url: &str) -> Result<VideoInfo> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["--dump-json", "--skip-download"]);
        if self.settings.no_playlist {
            cmd.arg("--no-playlist");
        }
        let output = cmd
            .arg(url)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| AppError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rfind(|l| l.contains("ERROR"))
                .unwrap_or("yt-dlp could not read the video info")
                .trim()
                .to_string();
            return Err(AppError::Probe(reason));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        // One JSON document per line; only the first video is of interest
        let first = stdout
            .lines()
            .find(|l| !l.trim().is_empty())
            .ok_or_else(|| AppError::Probe("yt-dlp printed no video info".into()))?;
        Ok(serde_json::from_str(first)?)
    }
}

/// Builds the yt-dlp arguments for one download attempt.
///
/// The URL is always last.
pub fn build_ytdlp_command_args(
    settings: &Settings,
    custom_args: &[String],
    output_dir: &Path,
    format: &str,
    url: &str,
) -> Vec<String> {
    let output_template = output_dir
        .join(&settings.output_template)
        .to_string_lossy()
        .to_string();

    let mut args = vec![
        "--format".to_string(),
        format.to_string(),
        "--output".to_string(),
        output_template,
        "--merge-output-format".to_string(),
        "mp4".to_string(),
        // Fail instead of keeping unmerged streams when ffmpeg is missing
        "--abort-on-error".to_string(),
    ];

    if settings.no_playlist {
        args.push("--no-playlist".to_string());
    }

    if settings.copy_streams {
        args.push("--postprocessor-args".to_string());
        args.push("ffmpeg:-c:v copy -c:a copy".to_string());
    }

    args.push("--newline".to_string());
    args.extend(custom_args.iter().cloned());
    args.push(url.to_string());

    args
}
