use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::errors::AppError;

/// Flags that conflict with the arguments best-dl always passes to yt-dlp
const CONFLICTING_FLAGS: &[&str] = &[
    "--output",
    "-o",
    "--format",
    "-f",
    "--merge-output-format",
];

/// Video format selection presets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FormatPreset {
    /// Best video merged with best audio, else the best single file
    #[default]
    Best,
    /// Prefer 1080p/720p video, then the best combined file
    PlatformOptimized,
    /// Up to 1080p
    #[serde(rename = "hd1080p")]
    HD1080p,
    /// Up to 720p
    #[serde(rename = "hd720p")]
    HD720p,
    /// Up to 480p
    #[serde(rename = "sd480p")]
    SD480p,
}

impl FormatPreset {
    /// Get the yt-dlp `--format` selector for this preset
    pub fn get_format_arg(&self) -> &'static str {
        match self {
            FormatPreset::Best => "bestvideo+bestaudio/best",
            FormatPreset::PlatformOptimized => {
                "bestvideo[height>=1080]+bestaudio/bestvideo[height>=720]+bestaudio/bestvideo+bestaudio/best[height>=1080]/best[height>=720]/best"
            }
            FormatPreset::HD1080p => "bestvideo[height<=1080]+bestaudio/best[height<=1080]",
            FormatPreset::HD720p => "bestvideo[height<=720]+bestaudio/best[height<=720]",
            FormatPreset::SD480p => "bestvideo[height<=480]+bestaudio/best[height<=480]",
        }
    }
}

/// Format selectors tried in order when `--fallback` is on
pub const FALLBACK_FORMATS: &[&str] = &[
    "best",
    "bestvideo+bestaudio/best",
    "bestvideo[height>=1080]+bestaudio/bestvideo[height>=720]+bestaudio/best",
    "worst",
];

/// Persistent settings for best-dl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory downloads are written into
    pub output_dir: PathBuf,
    /// Format preset to use
    pub format_preset: FormatPreset,
    /// yt-dlp output template, relative to `output_dir`
    pub output_template: String,
    /// Download only the referenced video, never the surrounding playlist
    pub no_playlist: bool,
    /// Merge streams with `-c copy` instead of re-encoding
    pub copy_streams: bool,
    /// Use ASCII indicators instead of emoji (for terminal compatibility)
    #[serde(default)]
    pub use_ascii_indicators: bool,
    /// Custom yt-dlp arguments (shell-style, validated for conflicts)
    #[serde(default)]
    pub custom_ytdlp_args: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("downloads"),
            format_preset: FormatPreset::default(),
            output_template: "%(title)s.%(ext)s".to_string(),
            no_playlist: true,
            copy_streams: true,
            use_ascii_indicators: false,
            custom_ytdlp_args: String::new(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    fn get_settings_path() -> PathBuf {
        let mut config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.push("best-dl");
        config_dir.push("settings.json");
        config_dir
    }

    /// Validate custom yt-dlp arguments for conflicts
    ///
    /// Returns Ok(()) if valid, or Err with a description of the conflict.
    pub fn validate_custom_args(args: &str) -> std::result::Result<(), String> {
        if args.trim().is_empty() {
            return Ok(());
        }

        let parsed = match shlex::split(args) {
            Some(args) => args,
            None => return Err("Invalid argument syntax (unmatched quotes)".to_string()),
        };

        for arg in &parsed {
            for conflict in CONFLICTING_FLAGS {
                if arg == *conflict || arg.starts_with(&format!("{}=", conflict)) {
                    return Err(format!(
                        "'{}' conflicts with best-dl's internal handling",
                        conflict
                    ));
                }
            }
        }

        Ok(())
    }

    /// Parse and validate the custom arguments
    pub fn custom_args(&self) -> crate::errors::Result<Vec<String>> {
        Self::validate_custom_args(&self.custom_ytdlp_args).map_err(AppError::Config)?;

        Ok(shlex::split(&self.custom_ytdlp_args).unwrap_or_default())
    }

    /// Load settings from the user config directory, creating defaults if none exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_settings_path())
    }

    /// Load settings from `path`, writing defaults there if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_settings = Self::default();
            default_settings.save_to(path)?;
            return Ok(default_settings);
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open settings file: {:?}", path))?;
        let reader = BufReader::new(file);

        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))
    }

    /// Save settings using an atomic write (temp file, then rename)
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }
        let temp_path = path.with_extension("json.tmp");

        let settings_json = serde_json::to_string_pretty(self)?;

        fs::write(&temp_path, &settings_json)
            .with_context(|| format!("Failed to write temp settings file: {:?}", temp_path))?;

        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename temp settings to: {:?}", path))
    }
}
