use crate::algorithm::{Algorithm, AlgorithmDescriptor};
use crate::error::Error;
use crate::tracker::InitPolicy;

use clap::Parser;
use serde_derive::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;

/// Scrub through a video, mark regions and watch overlay images follow them.
///
/// Keys: space = select regions, enter = play/pause, left/right = seek 10s,
/// d = debug info, esc = quit.
#[derive(Parser, Debug)]
#[command(name = "overtrack", version)]
pub struct Cli {
    /// Video file to review
    pub source: PathBuf,

    /// Overlay images, matched to selected regions in selection order
    pub overlays: Vec<PathBuf>,

    /// Tracking algorithm: kcf, csrt, mil, medianflow, boosting or tld
    #[arg(short, long, default_value = "csrt")]
    pub algorithm: String,

    /// Whether the tracker's reported box size is trusted; when false the size
    /// selected by the user is kept [default: per algorithm]
    #[arg(long)]
    pub reports_size: Option<bool>,

    /// How per-region tracking failures affect the other regions
    #[arg(long, value_enum, default_value_t = InitPolicy::AllOrNothing)]
    pub init_policy: InitPolicy,

    /// Upper bound for displayed frame width
    #[arg(long, default_value_t = 640)]
    pub max_width: u32,

    /// Upper bound for displayed frame height
    #[arg(long, default_value_t = 360)]
    pub max_height: u32,

    /// Write located regions as JSON lines to this file
    #[arg(long)]
    pub dump_tracks: Option<PathBuf>,

    /// Start paused
    #[arg(long)]
    pub paused: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub source: PathBuf,
    pub overlays: Vec<PathBuf>,
    pub descriptor: AlgorithmDescriptor,
    pub init_policy: InitPolicy,
    pub max_size: (u32, u32),
    pub dump_tracks: Option<PathBuf>,
    pub start_paused: bool,
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_cli(Cli::try_parse_from(args)?)
    }

    pub fn from_cli(cli: Cli) -> Result<Self, Error> {
        let algorithm: Algorithm = cli.algorithm.parse()?;

        Ok(Self {
            source: cli.source,
            overlays: cli.overlays,
            descriptor: AlgorithmDescriptor::new(algorithm).with_reports_size(cli.reports_size),
            init_policy: cli.init_policy,
            max_size: (cli.max_width, cli.max_height),
            dump_tracks: cli.dump_tracks,
            start_paused: cli.paused,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::from_args(["overtrack", "clip.mp4"]).unwrap();

        assert_eq!(config.source, PathBuf::from("clip.mp4"));
        assert!(config.overlays.is_empty());
        assert_eq!(config.descriptor, AlgorithmDescriptor::default());
        assert_eq!(config.init_policy, InitPolicy::AllOrNothing);
        assert_eq!(config.max_size, (640, 360));
        assert!(!config.start_paused);
    }

    #[test]
    fn overlays_and_options() {
        let config = Config::from_args([
            "overtrack",
            "clip.mp4",
            "a.png",
            "b.png",
            "--algorithm",
            "KCF",
            "--reports-size",
            "true",
            "--init-policy",
            "per-slot",
            "--paused",
        ])
        .unwrap();

        assert_eq!(config.overlays, vec![PathBuf::from("a.png"), PathBuf::from("b.png")]);
        assert_eq!(config.descriptor.algorithm, Algorithm::Kcf);
        assert!(config.descriptor.reports_size);
        assert_eq!(config.init_policy, InitPolicy::PerSlot);
        assert!(config.start_paused);
    }

    #[test]
    fn missing_source_is_a_usage_error() {
        let err = Config::from_args(["overtrack"]).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let err = Config::from_args(["overtrack", "clip.mp4", "-a", "goturn"]).unwrap_err();
        assert!(matches!(err, Error::UnknownAlgorithm(_)));

        let config = Config::from_args(["overtrack", "clip.mp4", "-a", "MedianFlow"]).unwrap();
        assert_eq!(config.descriptor.algorithm, Algorithm::MedianFlow);
    }
}
