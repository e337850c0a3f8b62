use std::io::{self, Write};

/// Platforms shown by `--platforms`. yt-dlp supports many more.
pub const POPULAR_PLATFORMS: &[&str] = &[
    "YouTube",
    "Vimeo",
    "Dailymotion",
    "Twitch",
    "TikTok",
    "Instagram",
    "Facebook",
    "Twitter",
    "Reddit",
];

pub const UNKNOWN_PLATFORM: &str = "Unknown (but likely supported)";

/// Host suffixes and the platform they belong to, checked in order
const PLATFORM_HOSTS: &[(&str, &str)] = &[
    ("youtube.com", "YouTube"),
    ("youtu.be", "YouTube"),
    ("vimeo.com", "Vimeo"),
    ("tiktok.com", "TikTok"),
    ("instagram.com", "Instagram"),
    ("facebook.com", "Facebook"),
    ("fb.com", "Facebook"),
    ("twitter.com", "Twitter"),
    ("x.com", "Twitter"),
    ("twitch.tv", "Twitch"),
    ("dailymotion.com", "Dailymotion"),
    ("reddit.com", "Reddit"),
];

/// Names the hosting platform of a video URL.
///
/// Matches on the parsed host when the input is a URL, so `netflix.com`
/// is not mistaken for `x.com`. Inputs that do not parse fall back to a
/// substring match on the raw text.
pub fn detect_platform(url: &str) -> &'static str {
    match url::Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_lowercase)) {
        Some(host) => PLATFORM_HOSTS
            .iter()
            .find(|(suffix, _)| host == *suffix || host.ends_with(&format!(".{}", suffix)))
            .map(|(_, name)| *name)
            .unwrap_or(UNKNOWN_PLATFORM),
        None => PLATFORM_HOSTS
            .iter()
            .find(|(suffix, _)| url.contains(suffix))
            .map(|(_, name)| *name)
            .unwrap_or(UNKNOWN_PLATFORM),
    }
}

/// Status markers for console output
#[derive(Debug, Clone, Copy)]
pub struct Indicators {
    pub ok: &'static str,
    pub fail: &'static str,
    pub video: &'static str,
    pub platform: &'static str,
    pub done: &'static str,
}

impl Indicators {
    pub const fn new(ascii: bool) -> Self {
        if ascii {
            Self {
                ok: "[OK]",
                fail: "[FAIL]",
                video: "[>]",
                platform: "[*]",
                done: "[=]",
            }
        } else {
            Self {
                ok: "✅",
                fail: "❌",
                video: "📹",
                platform: "🎯",
                done: "🎉",
            }
        }
    }
}

/// Writes the `--platforms` listing
pub fn print_platforms(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Supported platforms include:")?;
    for (i, platform) in POPULAR_PLATFORMS.iter().enumerate() {
        writeln!(out, "   {:2}. {}", i + 1, platform)?;
    }
    writeln!(out, "   ... and 1000+ more!")?;
    writeln!(out)?;
    writeln!(out, "Just pass any video URL and it will work!")
}

/// Formats a duration in seconds as `H:MM:SS` or `M:SS`
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

/// Formats a byte count in MiB with one decimal
pub fn format_filesize(bytes: u64) -> String {
    format!("{:.1}MB", bytes as f64 / 1024.0 / 1024.0)
}
