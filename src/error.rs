use std::path::PathBuf;

/// Failures on the decode/write side of a single video.
///
/// The batch loop logs these and moves on to the next file.
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("could not open video file {0}")]
    Open(PathBuf),

    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),

    #[error("decoding failed in {path} at frame {frame}")]
    Decode {
        path: PathBuf,
        frame: u64,
        #[source]
        source: opencv::Error,
    },

    #[error("failed to write frame {0}")]
    Write(PathBuf),
}

/// OpenCV only takes `&str` paths.
pub fn path_str(path: &std::path::Path) -> Result<&str, VideoError> {
    path.to_str()
        .ok_or_else(|| VideoError::NonUtf8Path(path.to_path_buf()))
}
