//! Video metadata from `yt-dlp --dump-json` and the format listing built on it.

use serde::Deserialize;
use std::{
    cmp::Ordering,
    io::{self, Write},
};

use crate::utils::display::{format_duration, format_filesize};

/// The subset of yt-dlp's info JSON best-dl reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoInfo {
    pub title: Option<String>,
    pub extractor_key: Option<String>,
    pub duration: Option<f64>,
    pub uploader: Option<String>,
    pub upload_date: Option<String>,
    #[serde(default)]
    pub formats: Vec<FormatInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatInfo {
    pub format_id: String,
    pub ext: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<f64>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    pub filesize: Option<u64>,
    pub abr: Option<f64>,
}

impl FormatInfo {
    fn has_video(&self) -> bool {
        self.height.is_some() && self.vcodec.as_deref().is_some_and(|c| c != "none")
    }

    fn has_audio(&self) -> bool {
        self.acodec.as_deref().is_some_and(|c| c != "none")
    }

    fn resolution(&self) -> String {
        match (self.width, self.height) {
            (Some(w), Some(h)) => format!("{}x{}", w, h),
            (None, Some(h)) => h.to_string(),
            _ => "N/A".to_string(),
        }
    }

    fn quality_key(&self) -> (u32, f64) {
        (self.height.unwrap_or(0), self.fps.unwrap_or(0.0))
    }
}

const MAX_VIDEO_ROWS: usize = 10;
const MAX_AUDIO_ROWS: usize = 5;

fn by_quality_desc(a: &FormatInfo, b: &FormatInfo) -> Ordering {
    let (ha, fa) = a.quality_key();
    let (hb, fb) = b.quality_key();
    hb.cmp(&ha).then(fb.partial_cmp(&fa).unwrap_or(Ordering::Equal))
}

fn na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

fn truncated(value: Option<&str>, max: usize) -> String {
    na(value).chars().take(max).collect()
}

impl VideoInfo {
    /// Video formats sorted best first (height, then fps)
    pub fn video_formats(&self) -> Vec<&FormatInfo> {
        let mut video: Vec<_> = self.formats.iter().filter(|f| f.has_video()).collect();
        video.sort_by(|a, b| by_quality_desc(a, b));
        video
    }

    /// Audio-only formats sorted by bitrate, best first
    pub fn audio_formats(&self) -> Vec<&FormatInfo> {
        let mut audio: Vec<_> = self
            .formats
            .iter()
            .filter(|f| !f.has_video() && f.has_audio())
            .collect();
        audio.sort_by(|a, b| {
            b.abr
                .unwrap_or(0.0)
                .partial_cmp(&a.abr.unwrap_or(0.0))
                .unwrap_or(Ordering::Equal)
        });
        audio
    }

    /// Writes title, platform, duration and uploader
    pub fn write_summary(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "   Title: {}", na(self.title.as_deref()))?;
        writeln!(out, "   Platform: {}", na(self.extractor_key.as_deref()))?;
        match self.duration {
            Some(secs) => writeln!(out, "   Duration: {}", format_duration(secs))?,
            None => writeln!(out, "   Duration: N/A")?,
        }
        writeln!(out, "   Uploader: {}", na(self.uploader.as_deref()))
    }

    /// Writes the format table: top video formats, top audio formats, best video
    pub fn write_format_table(&self, out: &mut impl Write) -> io::Result<()> {
        self.write_summary(out)?;
        writeln!(out, "   Upload date: {}", na(self.upload_date.as_deref()))?;

        if self.formats.is_empty() {
            return writeln!(out, "No formats available");
        }

        writeln!(out)?;
        writeln!(out, "Available formats ({} total):", self.formats.len())?;
        writeln!(
            out,
            "{:<10} {:<10} {:<12} {:<5} {:<10} {:<12}",
            "ID", "Extension", "Resolution", "FPS", "Codec", "Filesize"
        )?;

        let video = self.video_formats();
        writeln!(out, "VIDEO FORMATS:")?;
        for f in video.iter().take(MAX_VIDEO_ROWS) {
            let fps = f.fps.map(|v| format!("{}", v)).unwrap_or_else(|| "N/A".into());
            let size = f.filesize.map(format_filesize).unwrap_or_else(|| "N/A".into());
            writeln!(
                out,
                "{:<10} {:<10} {:<12} {:<5} {:<10} {:<12}",
                f.format_id,
                na(f.ext.as_deref()),
                f.resolution(),
                fps,
                truncated(f.vcodec.as_deref(), 10),
                size
            )?;
        }

        writeln!(out, "AUDIO FORMATS:")?;
        for f in self.audio_formats().iter().take(MAX_AUDIO_ROWS) {
            let abr = f.abr.map(|v| format!("{}", v)).unwrap_or_else(|| "N/A".into());
            writeln!(
                out,
                "{:<10} {:<10} {:<12} {:<5} {:<10}",
                f.format_id,
                na(f.ext.as_deref()),
                "Audio",
                abr,
                truncated(f.acodec.as_deref(), 10)
            )?;
        }

        if let Some(best) = video.first() {
            writeln!(
                out,
                "Best video format: {} - {} @ {} fps",
                best.format_id,
                best.resolution(),
                best.fps.map(|v| v.to_string()).unwrap_or_else(|| "N/A".into())
            )?;
        }

        Ok(())
    }
}
