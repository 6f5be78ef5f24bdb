//! Command-line configuration
//!
//! [`Cli`] is the raw clap surface; [`Config::from_cli`] validates it into
//! the values the binary actually runs with.

use crate::driver::DataLayout;
use crate::errors::ConfigError;
use crate::sort::Algorithm;
use crate::threaded::ThreadedAlgorithm;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_SIZE: usize = 64;
pub const MAX_SIZE: usize = 4096;
pub const DEFAULT_INTERVAL_MS: u64 = 5;

#[derive(Debug, Parser)]
#[command(name = "sortty", version, about = "Step through sorting algorithms one operation at a time")]
pub struct Cli {
    /// bubble, selection, insertion, quick, merge or heap
    #[arg(short, long, default_value = "quick")]
    pub algorithm: Algorithm,

    /// Run every algorithm in turn (with --threaded, every routine)
    #[arg(long, conflicts_with = "algorithm")]
    pub all: bool,

    /// Run a worker-thread routine instead: bubble, awful or quick.
    /// Headless only
    #[arg(short, long, value_name = "ROUTINE", requires = "headless", conflicts_with = "algorithm")]
    pub threaded: Option<ThreadedAlgorithm>,

    /// Number of elements
    #[arg(short = 'n', long, default_value_t = DEFAULT_SIZE)]
    pub size: usize,

    /// random, sorted or reversed
    #[arg(short, long, default_value = "random")]
    pub layout: DataLayout,

    /// Seed for the random layout (drawn at startup if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Delay between steps while playing
    #[arg(short, long = "interval-ms", default_value_t = DEFAULT_INTERVAL_MS)]
    pub interval_ms: u64,

    /// Print a counter summary instead of starting the TUI
    #[arg(long)]
    pub headless: bool,

    /// Tracing filter, e.g. `info` or `sortty::sort=trace`
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,

    /// Write logs to this file (the TUI owns stderr)
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

/// Validated run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Algorithms to run, in order
    pub algorithms: Vec<Algorithm>,
    /// Worker-thread routines to run instead; empty unless `--threaded`
    pub threaded: Vec<ThreadedAlgorithm>,
    pub size: usize,
    pub layout: DataLayout,
    pub seed: u64,
    pub interval: Duration,
    pub headless: bool,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        if cli.size > MAX_SIZE {
            return Err(ConfigError::SizeTooLarge {
                size: cli.size,
                max: MAX_SIZE,
            });
        }

        EnvFilter::try_new(&cli.log_level).map_err(|source| ConfigError::LogFilter {
            filter: cli.log_level.clone(),
            source,
        })?;

        let (algorithms, threaded) = match (cli.threaded, cli.all) {
            (Some(_), true) => (Vec::new(), ThreadedAlgorithm::ALL.to_vec()),
            (Some(routine), false) => (Vec::new(), vec![routine]),
            (None, true) => (Algorithm::ALL.to_vec(), Vec::new()),
            (None, false) => (vec![cli.algorithm], Vec::new()),
        };

        Ok(Config {
            algorithms,
            threaded,
            size: cli.size,
            layout: cli.layout,
            seed: cli.seed.unwrap_or_else(rand::random),
            interval: Duration::from_millis(cli.interval_ms),
            headless: cli.headless,
            log_level: cli.log_level,
            log_file: cli.log_file,
        })
    }

    /// The initial data every run starts from
    pub fn values(&self) -> Vec<u32> {
        self.layout.generate(self.size, self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sortty").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_cli(parse(&["--seed", "1"])).unwrap();
        assert_eq!(config.algorithms, vec![Algorithm::Quick]);
        assert_eq!(config.size, DEFAULT_SIZE);
        assert_eq!(config.layout, DataLayout::Random);
        assert_eq!(config.interval, Duration::from_millis(DEFAULT_INTERVAL_MS));
        assert!(!config.headless);
    }

    #[test]
    fn test_all_selects_every_algorithm() {
        let config = Config::from_cli(parse(&["--all", "--headless"])).unwrap();
        assert_eq!(config.algorithms, Algorithm::ALL.to_vec());
    }

    #[test]
    fn test_size_limit() {
        let err = Config::from_cli(parse(&["--size", "5000"])).unwrap_err();
        assert!(matches!(err, ConfigError::SizeTooLarge { size: 5000, max: MAX_SIZE }));
    }

    #[test]
    fn test_threaded_routine_selected() {
        let config = Config::from_cli(parse(&["--headless", "--threaded", "awful"])).unwrap();
        assert_eq!(config.threaded, vec![ThreadedAlgorithm::Awful]);
        assert!(config.algorithms.is_empty());

        let config = Config::from_cli(parse(&["--headless", "--threaded", "quick", "--all"])).unwrap();
        assert_eq!(config.threaded, ThreadedAlgorithm::ALL.to_vec());
    }

    #[test]
    fn test_threaded_needs_headless() {
        assert!(Cli::try_parse_from(["sortty", "--threaded", "bubble"]).is_err());
        assert!(Cli::try_parse_from(["sortty", "--headless", "--threaded", "bogo"]).is_err());
        assert!(
            Cli::try_parse_from(["sortty", "--headless", "-t", "quick", "-a", "merge"]).is_err()
        );
    }

    #[test]
    fn test_machines_run_without_threaded() {
        let config = Config::from_cli(parse(&["--all"])).unwrap();
        assert!(config.threaded.is_empty());
    }

    #[test]
    fn test_bad_log_filter_rejected() {
        let err = Config::from_cli(parse(&["--log-level", "sortty=loud"])).unwrap_err();
        assert!(matches!(err, ConfigError::LogFilter { ref filter, .. } if filter == "sortty=loud"));
        assert!(Config::from_cli(parse(&["--log-level", "sortty::sort=trace"])).is_ok());
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        assert!(Cli::try_parse_from(["sortty", "--algorithm", "bogo"]).is_err());
    }
}
