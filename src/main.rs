mod config;
mod core;
mod decoder;
mod error;

use anyhow::Result;
use clap::Parser;
use log::debug;
use std::io::Write;
use std::path::PathBuf;

use crate::config::{Config, DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_DIR};
use crate::core::extractor;

/// Extracts frames from every video in a directory into per-video JPEG folders.
///
/// Every option falls back to its environment variable, so running with no
/// flags at all is the normal mode.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory scanned for video files
    #[arg(long, env = "VIDEO_SOURCE_DIR", default_value = DEFAULT_SOURCE_DIR)]
    source_dir: PathBuf,

    /// Base directory; each video gets a subfolder named after its file stem
    #[arg(long, env = "OUTPUT_BASE_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Frames per second to keep (0 keeps every frame)
    #[arg(long = "fps", env = "DESIRED_FRAME_RATE")]
    desired_frame_rate: Option<String>,

    /// JPEG quality, 0-100
    #[arg(long, env = "JPEG_QUALITY")]
    jpeg_quality: Option<String>,

    /// Generate a placeholder clip when the source directory has no videos
    #[arg(long, env = "GENERATE_DUMMY_VIDEO")]
    generate_dummy: Option<String>,

    /// Print the run summary as JSON on stdout
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config::resolve(
            self.source_dir.clone(),
            self.output_dir.clone(),
            self.desired_frame_rate.as_deref(),
            self.jpeg_quality.as_deref(),
            self.generate_dummy.as_deref(),
        )
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            writeln!(buf, "[{} {}] {}", timestamp, record.level(), record.args())
        })
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = cli.config();
    debug!("{:?}", config);

    let summary = extractor::run(&config)?;
    summary.log();

    if cli.json {
        println!("{}", summary.to_json()?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_into_config() {
        let cli = Cli::try_parse_from([
            "vidframes",
            "--source-dir",
            "in",
            "--output-dir",
            "out",
            "--fps",
            "2.5",
            "--generate-dummy",
            "no",
            "--json",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.source_dir, PathBuf::from("in"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.desired_frame_rate, 2.5);
        assert!(!config.generate_dummy);
        assert!(cli.json);
    }
}
