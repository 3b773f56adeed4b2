use log::info;
use serde::Serialize;
use std::path::PathBuf;

/// Per-video outcome of a successful extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoStats {
    pub video: PathBuf,
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub stride: u64,
    pub frames_read: u64,
    pub frames_saved: u64,
}

/// What a whole batch run did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub dummy_video: Option<PathBuf>,
    pub processed: Vec<VideoStats>,
    /// Non-video files and videos that failed.
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<String>,
}

impl RunSummary {
    pub fn videos_processed(&self) -> usize {
        self.processed.len()
    }

    pub fn files_skipped(&self) -> usize {
        self.skipped.len()
    }

    pub fn frames_saved(&self) -> u64 {
        self.processed.iter().map(|v| v.frames_saved).sum()
    }

    pub fn log(&self) {
        info!("--- Summary ---");
        info!("Total videos processed: {}", self.videos_processed());
        info!("Total files skipped (non-video or error): {}", self.files_skipped());
        info!("Total frames saved: {}", self.frames_saved());
        let base = std::fs::canonicalize(&self.output_dir).unwrap_or_else(|_| self.output_dir.clone());
        info!("All extracted frames are located in subfolders within: {}", base.display());
    }

    pub fn report(&self) -> SummaryReport<'_> {
        SummaryReport {
            videos_processed: self.videos_processed(),
            files_skipped: self.files_skipped(),
            frames_saved: self.frames_saved(),
            summary: self,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.report())
    }
}

/// Serialized form of a [`RunSummary`] with its totals up front.
#[derive(Debug, Serialize)]
pub struct SummaryReport<'a> {
    pub videos_processed: usize,
    pub files_skipped: usize,
    pub frames_saved: u64,
    #[serde(flatten)]
    pub summary: &'a RunSummary,
}
