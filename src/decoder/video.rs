use log::{debug, warn};
use opencv::{prelude::*, videoio};
use std::path::{Path, PathBuf};

use crate::error::{path_str, VideoError};

/// What the container reports about a stream. Any of these may be zero when
/// the backend cannot tell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub frame_count: Option<u64>,
}

/// Sequential frame reader over one video file.
///
/// The capture is released when the decoder is dropped, whether decoding ran
/// to the end or bailed out early.
pub struct VideoDecoder {
    capture: videoio::VideoCapture,
    path: PathBuf,
    info: VideoInfo,
    frames_read: u64,
}

impl VideoDecoder {
    pub fn open(path: &Path) -> Result<Self, VideoError> {
        // CAP_ANY lets OpenCV pick the backend (FFmpeg, GStreamer, MSMF, AVFoundation...)
        let capture = videoio::VideoCapture::from_file(path_str(path)?, videoio::CAP_ANY)
            .map_err(|e| {
                debug!("VideoCapture::from_file({}) failed: {}", path.display(), e);
                VideoError::Open(path.to_path_buf())
            })?;

        if !capture.is_opened().unwrap_or(false) {
            return Err(VideoError::Open(path.to_path_buf()));
        }

        let prop = |id: i32| capture.get(id).unwrap_or(0.0);
        let fps = prop(videoio::CAP_PROP_FPS);
        let frame_count = prop(videoio::CAP_PROP_FRAME_COUNT);
        let info = VideoInfo {
            width: prop(videoio::CAP_PROP_FRAME_WIDTH).max(0.0) as u32,
            height: prop(videoio::CAP_PROP_FRAME_HEIGHT).max(0.0) as u32,
            fps: if fps.is_finite() && fps > 0.0 { fps } else { 0.0 },
            frame_count: (frame_count.is_finite() && frame_count > 0.0).then(|| frame_count as u64),
        };

        Ok(Self {
            capture,
            path: path.to_path_buf(),
            info,
            frames_read: 0,
        })
    }

    pub fn info(&self) -> VideoInfo {
        self.info
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Decodes the next frame into `frame`. Returns `Ok(false)` at end of
    /// stream; an empty frame counts as end of stream too.
    pub fn read_frame_into(&mut self, frame: &mut Mat) -> Result<bool, VideoError> {
        let got = self.capture.read(frame).map_err(|source| VideoError::Decode {
            path: self.path.clone(),
            frame: self.frames_read,
            source,
        })?;
        if !got || frame.empty() {
            return Ok(false);
        }
        self.frames_read += 1;
        Ok(true)
    }
}

impl Drop for VideoDecoder {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            warn!("Failed to release {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = VideoDecoder::open(&dir.path().join("nope.mp4")).err().unwrap();
        assert!(matches!(err, VideoError::Open(_)));
    }

    #[test]
    fn open_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.mp4");
        std::fs::write(&path, b"definitely not a video container").unwrap();
        assert!(VideoDecoder::open(&path).is_err());
    }

    #[test]
    fn reads_generated_clip_to_the_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.avi");
        crate::core::dummy::write_color_clip(&path, 10.0, 64, 48, &[crate::core::dummy::RED], 1.0)
            .unwrap();

        let mut decoder = VideoDecoder::open(&path).unwrap();
        let info = decoder.info();
        assert_eq!((info.width, info.height), (64, 48));
        assert!((info.fps - 10.0).abs() < 0.5);

        let mut frame = Mat::default();
        while decoder.read_frame_into(&mut frame).unwrap() {}
        assert_eq!(decoder.frames_read(), 10);
        assert!(!decoder.read_frame_into(&mut frame).unwrap());
    }
}
