//! Resolved runtime configuration
//!
//! The binary parses flags and environment with clap and hands the result over as
//! a [`Config`]; nothing in the library reads the environment itself.

use std::path::PathBuf;
use std::time::Duration;

use crate::api::LookupError;
use crate::geo::{Coordinates, LocateError};
use crate::state::Unit;
use crate::store::RecentStore;

pub const APP_DIR_NAME: &str = "weather-lookup";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Which location service answers "current location"
#[derive(Clone, Debug, PartialEq)]
pub enum LocatorConfig {
    Ip { url: String },
    Fixed(Coordinates),
    Disabled,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub unit: Unit,
    pub data_dir: PathBuf,
    pub locator: LocatorConfig,
    pub timeout: Duration,
}

impl Config {
    pub fn recent_store(&self) -> RecentStore {
        RecentStore::in_dir(&self.data_dir)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SetupError {
    #[error("could not build weather client: {0}")]
    Client(#[from] LookupError),
    #[error("could not build location service: {0}")]
    Locator(#[from] LocateError),
}

/// `explicit`, or the per-user data directory, or the working directory.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| dirs_next::data_local_dir().map(|dir| dir.join(APP_DIR_NAME)))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Pick the location service from the command-line choices.
pub fn locator_config(
    disabled: bool,
    fixed: Option<(f64, f64)>,
    ip_url: impl Into<String>,
) -> LocatorConfig {
    match (disabled, fixed) {
        (true, _) => LocatorConfig::Disabled,
        (false, Some((lat, lon))) => LocatorConfig::Fixed(Coordinates { lat, lon }),
        (false, None) => LocatorConfig::Ip { url: ip_url.into() },
    }
}
