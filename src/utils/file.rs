use crate::errors::{AppError, Result};
use std::{fs, path::Path};

/// Loads URLs from a batch file.
///
/// One URL per line. Blank lines and lines starting with `#` are skipped.
/// Entries are not validated here; yt-dlp decides what it can handle.
pub fn read_batch_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(AppError::Io)?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect())
}

/// Creates the output directory (and parents) if it is missing
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(AppError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_batch_file_skips_blank_and_comments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.txt");
        fs::write(
            &path,
            "# queued\nhttps://example.com/1\n\n   https://example.com/2  \n#https://example.com/3\nbad-url\n",
        )
        .unwrap();

        let urls = read_batch_file(&path).unwrap();
        assert_eq!(
            urls,
            vec!["https://example.com/1", "https://example.com/2", "bad-url"]
        );
    }

    #[test]
    fn test_read_batch_file_missing_is_io_error() {
        let dir = tempdir().unwrap();
        let result = read_batch_file(&dir.path().join("nope.txt"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn test_ensure_output_dir_creates_nested_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("a").join("downloads");

        ensure_output_dir(&target).unwrap();
        ensure_output_dir(&target).unwrap();
        assert!(target.is_dir());
    }
}
