//! End-to-end runs of the best-dl binary against a fake yt-dlp script.
//!
//! The script writes an empty `.mp4` for every URL except those containing
//! "bad" or equal to "url1", which fail the way yt-dlp does.
#![cfg(unix)]

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    process::{Command, Output},
};
use tempfile::{TempDir, tempdir};

const FAKE_YTDLP: &str = r#"#!/bin/sh
for last; do :; done
if [ "$1" = "--version" ]; then echo "2099.01.01"; exit 0; fi
if [ "$1" = "--dump-json" ]; then
  echo '{"title": "Fake", "extractor_key": "Generic", "duration": 75, "uploader": "Tester", "formats": []}'
  exit 0
fi
out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "--output" ]; then out="$a"; fi
  prev="$a"
done
case "$last" in
  *bad*|url1) echo "ERROR: [generic] '$last' is not a valid URL." >&2; exit 1 ;;
esac
name=$(printf '%s' "$last" | tr -c 'A-Za-z0-9' '_')
path=$(printf '%s' "$out" | sed "s/%(title)s/$name/; s/%(ext)s/mp4/")
mkdir -p "$(dirname "$path")"
: > "$path"
echo "[download] Destination: $path"
echo "[download] 100% of 1.00MiB in 00:01"
echo "[Merger] Merging formats into \"$path\""
"#;

struct Sandbox {
    dir: TempDir,
    ytdlp: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let ytdlp = dir.path().join("fake-yt-dlp");
        fs::write(&ytdlp, FAKE_YTDLP).unwrap();
        fs::set_permissions(&ytdlp, fs::Permissions::from_mode(0o755)).unwrap();
        Self { dir, ytdlp }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_best-dl"))
            .args(args)
            .current_dir(self.dir.path())
            .env("BEST_DL_YTDLP", &self.ytdlp)
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }

    fn downloads(&self) -> PathBuf {
        self.dir.path().join("downloads")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn count_prefixed(text: &str, prefix: &str) -> usize {
    text.lines().filter(|l| l.starts_with(prefix)).count()
}

fn mp4_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "mp4"))
                .count()
        })
        .unwrap_or(0)
}

#[test]
fn test_single_url_downloads_one_file() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["https://example.com/watch?v=zjkBMFhNj_g"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert_eq!(count_prefixed(&text, "✅ Downloaded"), 1);
    assert_eq!(count_prefixed(&text, "❌"), 0);
    assert_eq!(mp4_files(&sandbox.downloads()), 1);
}

#[test]
fn test_bad_url_reports_failure_and_writes_nothing() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["bad-url"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert_eq!(count_prefixed(&text, "❌ Failed bad-url:"), 1);
    assert!(text.contains("is not a valid URL"));
    assert_eq!(mp4_files(&sandbox.downloads()), 0);
}

#[test]
fn test_failure_reason_is_printed_once() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["bad-url"]);

    assert_eq!(stdout(&output).matches("is not a valid URL").count(), 1);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("is not a valid URL"), "stderr: {}", stderr);
}

#[test]
fn test_failure_then_success() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["url1", "url2"]);

    let text = stdout(&output);
    assert_eq!(count_prefixed(&text, "❌ Failed url1:"), 1);
    assert_eq!(count_prefixed(&text, "✅ Downloaded url2 ->"), 1);
    assert_eq!(mp4_files(&sandbox.downloads()), 1);
    assert!(text.contains("Downloaded 1/2 videos successfully!"));
}

#[test]
fn test_strict_exits_nonzero_on_failure() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&["--strict", "url1", "url2"]);
    assert_eq!(output.status.code(), Some(1));

    let output = sandbox.run(&["--strict", "url2"]);
    assert!(output.status.success());
}

#[test]
fn test_no_urls_is_usage_error() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
    assert!(!sandbox.downloads().exists());
}

#[test]
fn test_empty_batch_file_is_usage_error() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.dir.path().join("links.txt"), "# nothing yet\n\n").unwrap();

    let output = sandbox.run(&["-a", "links.txt"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(!sandbox.downloads().exists());
}

#[test]
fn test_batch_file_urls_follow_arguments() {
    let sandbox = Sandbox::new();
    fs::write(
        sandbox.dir.path().join("links.txt"),
        "https://vimeo.com/1\n# skipped\nhttps://vimeo.com/2\n",
    )
    .unwrap();

    let output = sandbox.run(&["-a", "links.txt", "https://youtu.be/abc"]);

    let text = stdout(&output);
    let urls: Vec<_> = text
        .lines()
        .filter_map(|l| l.strip_prefix("URL: "))
        .collect();
    assert_eq!(
        urls,
        vec!["https://youtu.be/abc", "https://vimeo.com/1", "https://vimeo.com/2"]
    );
    assert_eq!(mp4_files(&sandbox.downloads()), 3);
}

#[test]
fn test_platforms_listing() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["--platforms"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("YouTube"));
    assert!(text.contains("Reddit"));
    assert!(!sandbox.downloads().exists());
}

#[test]
fn test_info_prints_metadata() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["--info", "https://www.youtube.com/watch?v=zjkBMFhNj_g"]);

    let text = stdout(&output);
    assert!(text.contains("Detected platform: YouTube"));
    assert!(text.contains("Title: Fake"));
    assert!(text.contains("Duration: 1:15"));
    assert_eq!(mp4_files(&sandbox.downloads()), 1);
}

#[test]
fn test_download_dir_override() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["-d", "elsewhere", "https://example.com/v"]);

    assert!(output.status.success());
    assert_eq!(mp4_files(&sandbox.dir.path().join("elsewhere")), 1);
    assert!(!sandbox.downloads().exists());
}

// dirs::config_dir only honours XDG_CONFIG_HOME on Linux
#[cfg(target_os = "linux")]
#[test]
fn test_settings_file_is_created() {
    let sandbox = Sandbox::new();
    sandbox.run(&["https://example.com/v"]);

    let settings = sandbox
        .dir
        .path()
        .join("config")
        .join("best-dl")
        .join("settings.json");
    assert!(settings.exists());
}
