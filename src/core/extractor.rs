use anyhow::{Context, Result};
use log::{error, info, warn};
use opencv::prelude::*;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::core::dummy;
use crate::core::sampler::FrameSampler;
use crate::core::scanner::{self, ScanResult};
use crate::core::summary::{RunSummary, VideoStats};
use crate::core::writer::FrameWriter;
use crate::decoder::VideoDecoder;
use crate::error::VideoError;

/// Decodes `video` front to back and writes every kept frame into
/// `output_dir` as `frame_NNNNNN.jpg`.
///
/// A decode or write failure part way through leaves the frames written so far
/// in `output_dir`; the returned error says how many.
pub fn extract_frames(
    video: &Path,
    output_dir: &Path,
    desired_fps: f64,
    jpeg_quality: i32,
) -> Result<VideoStats> {
    let mut decoder = VideoDecoder::open(video)?;
    let video_info = decoder.info();
    let name = video.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();

    info!("Processing '{}':", name);
    info!(
        "  Resolution: {}x{}, FPS: {:.2}, Total Frames: {}",
        video_info.width,
        video_info.height,
        video_info.fps,
        video_info.frame_count.map_or_else(|| "unknown".to_string(), |n| n.to_string())
    );

    let sampler = FrameSampler::new(video_info.fps, desired_fps);
    if desired_fps > 0.0 {
        if video_info.fps <= 0.0 {
            warn!("  Source FPS unknown, extracting every frame");
        }
        info!(
            "  Extracting frames at approximately {} frames per second (skipping {} frames).",
            desired_fps,
            sampler.stride() - 1
        );
    } else {
        info!("  Extracting every frame.");
    }

    let mut writer = FrameWriter::create(output_dir, jpeg_quality)?;
    if let Some(total) = video_info.frame_count {
        info!("  Expecting about {} frames to be saved.", sampler.kept_of(total));
    }

    if let Err(e) = copy_frames(&mut decoder, &sampler, &mut writer) {
        let written = writer.written();
        if written == 0 {
            return Err(e.into());
        }
        return Err(anyhow::Error::new(e).context(format!(
            "partial output: {} frames already written to {}",
            written,
            output_dir.display()
        )));
    }
    let frames_read = decoder.frames_read();
    drop(decoder);

    info!("  Finished processing '{}'.", name);
    info!("  Total frames processed: {}", frames_read);
    info!("  Total frames saved: {}", writer.written());

    Ok(VideoStats {
        video: video.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        width: video_info.width,
        height: video_info.height,
        fps: video_info.fps,
        stride: sampler.stride(),
        frames_read,
        frames_saved: writer.written(),
    })
}

fn copy_frames(
    decoder: &mut VideoDecoder,
    sampler: &FrameSampler,
    writer: &mut FrameWriter,
) -> Result<(), VideoError> {
    let mut frame = Mat::default();
    while decoder.read_frame_into(&mut frame)? {
        // frames_read already counts the frame just decoded
        if sampler.keep(decoder.frames_read() - 1) {
            writer.write(&frame)?;
        }
    }
    Ok(())
}

/// Runs the whole batch. Only failures that make the run meaningless (the
/// output base cannot be created) are returned; everything per-video is
/// logged and recorded in the summary.
pub fn run(config: &Config) -> Result<RunSummary> {
    let mut summary = RunSummary {
        output_dir: config.output_dir.clone(),
        ..Default::default()
    };

    if !config.output_dir.exists() {
        fs::create_dir_all(&config.output_dir).with_context(|| {
            format!("Failed to create output directory {}", config.output_dir.display())
        })?;
        info!("Created base output directory: {}", config.output_dir.display());
    }

    let source = &config.source_dir;
    let mut scan = if source.is_dir() {
        info!("Scanning videos in: {}", source.display());
        scanner::scan_videos(source)?
    } else {
        error!(
            "Video source directory '{}' does not exist or is not a directory",
            source.display()
        );
        ScanResult::default()
    };

    if scan.videos.is_empty() {
        warn!("No video files found in {}", source.display());
        if !config.generate_dummy {
            return Ok(summary);
        }
        match dummy::create_dummy_video(source) {
            Ok(path) => {
                summary.dummy_video = Some(path);
                scan = scanner::scan_videos(source)?;
            }
            Err(e) => {
                warn!("Cannot create dummy video: {:#}", e);
                warn!("Please provide your own videos in {}", source.display());
                return Ok(summary);
            }
        }
    }

    summary.skipped.extend(scan.skipped);

    // a folder only ever holds frames from the first video claiming its stem
    let mut stems: HashSet<OsString> = HashSet::new();

    for video in scan.videos {
        let Some(stem) = video.file_stem() else {
            continue;
        };
        info!("Found video: {}", video.display());
        if !stems.insert(stem.to_os_string()) {
            error!(
                "Another video already uses output folder '{}', skipping {}",
                stem.to_string_lossy(),
                video.display()
            );
            summary.failed.push(format!(
                "{}: output folder '{}' already used by another video",
                video.display(),
                stem.to_string_lossy()
            ));
            summary.skipped.push(video);
            continue;
        }
        let out = config.output_dir.join(stem);

        match extract_frames(&video, &out, config.desired_frame_rate, config.jpeg_quality) {
            Ok(stats) => summary.processed.push(stats),
            Err(e) => {
                error!("Error: {:#}. Skipping.", e);
                summary.failed.push(format!("{}: {:#}", video.display(), e));
                summary.skipped.push(video);
            }
        }
    }

    Ok(summary)
}
