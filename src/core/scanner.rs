use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "flv", "webm"];

/// Result of listing the source directory.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Video files, sorted by file name.
    pub videos: Vec<PathBuf>,
    /// Regular files that were not videos.
    pub skipped: Vec<PathBuf>,
}

pub fn is_video(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
    VIDEO_EXTENSIONS.contains(&ext.as_str())
}

pub fn scan_videos(dir: &Path) -> Result<ScanResult> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read source directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();

    files.sort();

    let (videos, skipped): (Vec<_>, Vec<_>) = files.into_iter().partition(|p| is_video(p));
    for path in &skipped {
        debug!("Skipping non-video file: {}", path.display());
    }

    Ok(ScanResult { videos, skipped })
}
