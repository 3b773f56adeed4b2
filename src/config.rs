use log::warn;
use std::path::PathBuf;

pub const DEFAULT_SOURCE_DIR: &str = "videos";
pub const DEFAULT_OUTPUT_DIR: &str = "frames";
pub const DEFAULT_JPEG_QUALITY: i32 = 95;

/// Resolved run configuration. Every field has a usable default.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Frames per second to keep. `0.0` keeps every frame.
    pub desired_frame_rate: f64,
    pub jpeg_quality: i32,
    pub generate_dummy: bool,
}

impl Config {
    /// Builds a config from raw (possibly missing or malformed) values.
    /// Bad values are reported and replaced with defaults.
    pub fn resolve(
        source_dir: PathBuf,
        output_dir: PathBuf,
        frame_rate: Option<&str>,
        jpeg_quality: Option<&str>,
        generate_dummy: Option<&str>,
    ) -> Self {
        Self {
            source_dir,
            output_dir,
            desired_frame_rate: parse_frame_rate(frame_rate),
            jpeg_quality: parse_jpeg_quality(jpeg_quality),
            generate_dummy: parse_flag(generate_dummy, true),
        }
    }
}

pub fn parse_frame_rate(raw: Option<&str>) -> f64 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0.0;
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => {
            warn!("DESIRED_FRAME_RATE={:?} is not a non-negative number, extracting every frame", raw);
            0.0
        }
    }
}

pub fn parse_jpeg_quality(raw: Option<&str>) -> i32 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_JPEG_QUALITY;
    };
    match raw.parse::<i32>() {
        Ok(v) => v.clamp(0, 100),
        Err(_) => {
            warn!("JPEG_QUALITY={:?} is not an integer, using {}", raw, DEFAULT_JPEG_QUALITY);
            DEFAULT_JPEG_QUALITY
        }
    }
}

pub fn parse_flag(raw: Option<&str>, default: bool) -> bool {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return default;
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        other => {
            warn!("unrecognised boolean {:?}, using {}", other, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rate_defaults_to_all_frames() {
        assert_eq!(parse_frame_rate(None), 0.0);
        assert_eq!(parse_frame_rate(Some("")), 0.0);
        assert_eq!(parse_frame_rate(Some("  ")), 0.0);
    }

    #[test]
    fn frame_rate_accepts_fractions() {
        assert_eq!(parse_frame_rate(Some("2")), 2.0);
        assert_eq!(parse_frame_rate(Some(" 0.5 ")), 0.5);
    }

    #[test]
    fn frame_rate_rejects_garbage_and_negatives() {
        assert_eq!(parse_frame_rate(Some("fast")), 0.0);
        assert_eq!(parse_frame_rate(Some("-3")), 0.0);
        assert_eq!(parse_frame_rate(Some("inf")), 0.0);
        assert_eq!(parse_frame_rate(Some("NaN")), 0.0);
    }

    #[test]
    fn jpeg_quality_is_clamped() {
        assert_eq!(parse_jpeg_quality(None), DEFAULT_JPEG_QUALITY);
        assert_eq!(parse_jpeg_quality(Some("80")), 80);
        assert_eq!(parse_jpeg_quality(Some("250")), 100);
        assert_eq!(parse_jpeg_quality(Some("-1")), 0);
        assert_eq!(parse_jpeg_quality(Some("high")), DEFAULT_JPEG_QUALITY);
    }

    #[test]
    fn flags() {
        assert!(parse_flag(None, true));
        assert!(!parse_flag(None, false));
        assert!(parse_flag(Some("YES"), false));
        assert!(!parse_flag(Some("off"), true));
        assert!(!parse_flag(Some("0"), true));
        assert!(parse_flag(Some("maybe"), true));
    }

    #[test]
    fn resolve_falls_back_per_field() {
        let cfg = Config::resolve(
            PathBuf::from("in"),
            PathBuf::from("out"),
            Some("bogus"),
            Some("70"),
            Some("false"),
        );
        assert_eq!(
            cfg,
            Config {
                source_dir: PathBuf::from("in"),
                output_dir: PathBuf::from("out"),
                desired_frame_rate: 0.0,
                jpeg_quality: 70,
                generate_dummy: false,
            }
        );
    }
}
