use std::{
    path::Path,
    process::{Command, Stdio},
};

/// Checks that yt-dlp and ffmpeg can be run.
///
/// # Returns
///
/// * `Result<(), Vec<String>>` - Ok if both tools answered their version flag, or
///   Err with one message per missing tool
///
/// A missing tool is not fatal for best-dl: a missing yt-dlp makes every URL
/// fail at spawn time, and a missing ffmpeg only fails the downloads that need
/// a merge. Callers log these messages as warnings.
pub fn check_dependencies(ytdlp: &Path) -> Result<(), Vec<String>> {
    let mut missing = Vec::new();

    if !responds(Command::new(ytdlp).arg("--version")) {
        missing.push(format!(
            "{} is not installed or not accessible.",
            ytdlp.display()
        ));
    }

    if !responds(Command::new("ffmpeg").arg("-version")) {
        missing.push(
            "ffmpeg is not installed or not accessible; separate audio/video streams cannot be merged."
                .to_string(),
        );
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

fn responds(cmd: &mut Command) -> bool {
    cmd.stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
