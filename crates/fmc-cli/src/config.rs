//! Tool configuration from environment and command line.

use std::env;
use std::path::PathBuf;

use clap::Parser;

const DEFAULT_AIRPORTS: &str = "airports.json";
const DEFAULT_NAV_DATA: &str = "nav_data.json";
const DEFAULT_LOG_FILTER: &str = "fmc_cli=info";

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Airport table (JSON object of ICAO -> [lat, lon])
    #[arg(long)]
    pub airports: Option<PathBuf>,

    /// Waypoint table (JSON object of name -> [[lat, lon], ...])
    #[arg(long)]
    pub nav_data: Option<PathBuf>,

    /// Log filter directive, e.g. "fmc_cli=debug,fmc_core=debug"
    #[arg(long)]
    pub log: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub airports_path: PathBuf,
    pub nav_data_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            airports_path: lookup("FMC_AIRPORTS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_AIRPORTS)),
            nav_data_path: lookup("FMC_NAV_DATA")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_NAV_DATA)),
            log_filter: lookup("FMC_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Command-line values win over the environment.
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(path) = &args.airports {
            self.airports_path = path.clone();
        }
        if let Some(path) = &args.nav_data {
            self.nav_data_path = path.clone();
        }
        if let Some(filter) = &args.log {
            self.log_filter = filter.clone();
        }
        self
    }
}
