use anyhow::{bail, Context, Result};
use log::info;
use opencv::{core, prelude::*, videoio};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::path_str;

pub const DUMMY_FILE_NAME: &str = "dummy_input_video.mp4";
pub const DUMMY_WIDTH: i32 = 640;
pub const DUMMY_HEIGHT: i32 = 480;
pub const DUMMY_FPS: f64 = 24.0;

// BGR, as OpenCV stores pixels
pub const RED: [f64; 3] = [0.0, 0.0, 255.0];
pub const GREEN: [f64; 3] = [0.0, 255.0, 0.0];
pub const BLUE: [f64; 3] = [255.0, 0.0, 0.0];

/// Writes a placeholder clip into `source_dir` so the pipeline has something
/// to chew on: one second each of red, green and blue at 24 fps.
pub fn create_dummy_video(source_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(source_dir)
        .with_context(|| format!("Failed to create source directory {}", source_dir.display()))?;
    let path = source_dir.join(DUMMY_FILE_NAME);
    info!("Creating a dummy video file {} for demonstration purposes...", path.display());

    if let Err(e) = write_dummy_video(&path) {
        // the writer may leave an empty container behind
        let _ = fs::remove_file(&path);
        return Err(e);
    }

    info!("Dummy video {} created successfully", path.display());
    Ok(path)
}

/// The placeholder clip itself, at any path. Returns the number of frames.
pub(crate) fn write_dummy_video(path: &Path) -> Result<u64> {
    write_color_clip(path, DUMMY_FPS, DUMMY_WIDTH, DUMMY_HEIGHT, &[RED, GREEN, BLUE], 1.0)
}

/// `.avi` gets Motion-JPEG, which OpenCV can write without any external
/// backend. Everything else asks for MPEG-4 part 2.
fn fourcc_for(path: &Path) -> Result<i32> {
    let is_avi = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("avi"));
    let code = if is_avi {
        videoio::VideoWriter::fourcc('M', 'J', 'P', 'G')?
    } else {
        videoio::VideoWriter::fourcc('m', 'p', '4', 'v')?
    };
    Ok(code)
}

/// Writes `colors.len()` solid segments of `seconds_each` seconds.
pub fn write_color_clip(
    path: &Path,
    fps: f64,
    width: i32,
    height: i32,
    colors: &[[f64; 3]],
    seconds_each: f64,
) -> Result<u64> {
    let mut writer = videoio::VideoWriter::new(
        path_str(path)?,
        fourcc_for(path)?,
        fps,
        core::Size::new(width, height),
        true,
    )
    .with_context(|| format!("Failed to create video writer for {}", path.display()))?;

    if !writer.is_opened()? {
        bail!("No video writer backend could open {}", path.display());
    }

    let frames_per_color = (fps * seconds_each).round().max(1.0) as u64;
    let mut written = 0;
    for &[b, g, r] in colors {
        let frame = Mat::new_rows_cols_with_default(
            height,
            width,
            core::CV_8UC3,
            core::Scalar::new(b, g, r, 0.0),
        )?;
        for _ in 0..frames_per_color {
            writer.write(&frame)?;
            written += 1;
        }
    }

    writer.release()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avi_uses_mjpeg() {
        let mjpg = videoio::VideoWriter::fourcc('M', 'J', 'P', 'G').unwrap();
        assert_eq!(fourcc_for(Path::new("x.avi")).unwrap(), mjpg);
        assert_eq!(fourcc_for(Path::new("x.AVI")).unwrap(), mjpg);
        assert_ne!(fourcc_for(Path::new("x.mp4")).unwrap(), mjpg);
    }

    fn assert_color(frame: &Mat, bgr: [f64; 3]) {
        let px = frame
            .at_2d::<core::Vec3b>(DUMMY_HEIGHT / 2, DUMMY_WIDTH / 2)
            .unwrap();
        for channel in 0..3 {
            let got = f64::from(px[channel]);
            // MJPG is lossy
            assert!((got - bgr[channel]).abs() < 60.0, "pixel {:?} vs expected {:?}", px, bgr);
        }
    }

    #[test]
    fn dummy_clip_is_three_seconds_of_red_green_blue() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dummy.avi");
        assert_eq!(write_dummy_video(&path).unwrap(), 72);

        let mut decoder = crate::decoder::VideoDecoder::open(&path).unwrap();
        let info = decoder.info();
        assert_eq!((info.width, info.height), (640, 480));
        assert!((info.fps - DUMMY_FPS).abs() < 0.5);

        let mut frames = Vec::new();
        let mut frame = Mat::default();
        while decoder.read_frame_into(&mut frame).unwrap() {
            frames.push(frame.try_clone().unwrap());
        }
        assert_eq!(decoder.frames_read(), 72);
        assert_color(&frames[0], RED);
        assert_color(&frames[36], GREEN);
        assert_color(&frames[71], BLUE);
    }

    #[test]
    fn color_clip_frame_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.avi");
        let written = write_color_clip(&path, 12.0, 32, 32, &[RED, GREEN, BLUE], 0.5).unwrap();
        assert_eq!(written, 18);
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }
}
