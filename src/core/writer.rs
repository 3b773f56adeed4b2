use anyhow::{Context, Result};
use log::info;
use opencv::{core::Vector, imgcodecs, prelude::*};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{path_str, VideoError};

pub fn frame_file_name(index: u64) -> String {
    format!("frame_{:06}.jpg", index)
}

/// Writes kept frames as sequentially numbered JPEGs into one folder.
pub struct FrameWriter {
    dir: PathBuf,
    params: Vector<i32>,
    next_index: u64,
}

impl FrameWriter {
    /// Creates `dir` (and parents) if needed.
    pub fn create(dir: &Path, jpeg_quality: i32) -> Result<Self> {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output folder {}", dir.display()))?;
            info!("Created output folder: {}", dir.display());
        }
        let params = Vector::from_slice(&[imgcodecs::IMWRITE_JPEG_QUALITY, jpeg_quality]);
        Ok(Self {
            dir: dir.to_path_buf(),
            params,
            next_index: 0,
        })
    }

    /// Frames written so far.
    pub fn written(&self) -> u64 {
        self.next_index
    }

    pub fn write(&mut self, frame: &Mat) -> Result<PathBuf, VideoError> {
        let path = self.dir.join(frame_file_name(self.next_index));
        match imgcodecs::imwrite(path_str(&path)?, frame, &self.params) {
            Ok(true) => {
                self.next_index += 1;
                Ok(path)
            }
            _ => Err(VideoError::Write(path)),
        }
    }
}
