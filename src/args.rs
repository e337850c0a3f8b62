use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Video URLs to download, in order
    #[arg(
        value_name = "URL",
        required_unless_present_any = ["platforms", "batch_file"]
    )]
    pub urls: Vec<String>,
    /// Read additional URLs from a file (one per line, '#' starts a comment)
    #[arg(short = 'a', long, value_name = "FILE")]
    pub batch_file: Option<PathBuf>,
    /// Download directory (overrides the configured one)
    #[arg(short, long)]
    pub download_dir: Option<PathBuf>,
    /// Print title, platform, duration and uploader before each download
    #[arg(short, long)]
    pub info: bool,
    /// List available formats instead of downloading
    #[arg(long)]
    pub list_formats: bool,
    /// Retry failed downloads with progressively simpler format selections
    #[arg(long)]
    pub fallback: bool,
    /// Exit with status 1 if any URL failed
    #[arg(long)]
    pub strict: bool,
    /// Show popular supported platforms and exit
    #[arg(long)]
    pub platforms: bool,
    /// yt-dlp executable to run
    #[arg(long, env = "BEST_DL_YTDLP", default_value = "yt-dlp")]
    pub ytdlp: PathBuf,
    /// Verbose logging (progress and yt-dlp chatter)
    #[arg(short, long)]
    pub verbose: bool,
}
