/// Service configuration loader - parses quakemon.toml
///
/// Keeps feed endpoints, location acquisition options and named observer
/// presets out of the code, so pointing at a mirror feed or adding a new
/// place to watch does not need a rebuild.
///
/// Every section has defaults, so a partial file (or none at all) is valid.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::ingest::usgs::{DEFAULT_BASE_URL, DEFAULT_FETCH_TIMEOUT};
use crate::location::LocationOptions;
use crate::model::{ObserverLocation, TimeWindow};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "quakemon.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("no observer named '{0}' in configuration")]
    UnknownObserver(String),
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedSettings,
    pub location: LocationSettings,
    #[serde(rename = "observer")]
    pub observers: Vec<ObserverPreset>,
}

/// `[feed]` — where and how to fetch the event feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub base_url: String,
    pub default_window: TimeWindow,
    pub timeout_secs: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_window: TimeWindow::Day,
            timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
        }
    }
}

/// `[location]` — acquisition options for environment-sourced positions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocationSettings {
    pub timeout_secs: u64,
    pub maximum_age_secs: u64,
    pub high_accuracy: bool,
}

impl Default for LocationSettings {
    fn default() -> Self {
        let options = LocationOptions::default();
        Self {
            timeout_secs: options.timeout.as_secs(),
            maximum_age_secs: options.maximum_age.as_secs(),
            high_accuracy: options.high_accuracy,
        }
    }
}

/// `[[observer]]` — a named place to evaluate felt intensity for.
#[derive(Debug, Clone, Deserialize)]
pub struct ObserverPreset {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub accuracy: Option<f64>,
}

impl From<&ObserverPreset> for ObserverLocation {
    fn from(preset: &ObserverPreset) -> Self {
        ObserverLocation {
            latitude: preset.latitude,
            longitude: preset.longitude,
            accuracy: preset.accuracy,
        }
    }
}

impl Config {
    /// Fetch timeout for the feed client.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.feed.timeout_secs)
    }

    pub fn location_options(&self) -> LocationOptions {
        LocationOptions {
            timeout: Duration::from_secs(self.location.timeout_secs),
            maximum_age: Duration::from_secs(self.location.maximum_age_secs),
            high_accuracy: self.location.high_accuracy,
        }
    }

    /// Looks up an observer preset by name (case-insensitive).
    pub fn observer(&self, name: &str) -> Result<ObserverLocation, ConfigError> {
        self.observers
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(name))
            .map(ObserverLocation::from)
            .ok_or_else(|| ConfigError::UnknownObserver(name.to_string()))
    }

    /// Observer presets keyed by name.
    pub fn observer_map(&self) -> HashMap<String, ObserverLocation> {
        self.observers
            .iter()
            .map(|o| (o.name.clone(), ObserverLocation::from(o)))
            .collect()
    }
}

/// Parses configuration text. `origin` names the source in error messages.
pub fn parse_config(contents: &str, origin: &str) -> Result<Config, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: origin.to_string(),
        source,
    })
}

/// Loads configuration from a specific file.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;

    parse_config(&contents, &display)
}

/// Loads `quakemon.toml` from the current working directory (project root
/// when running via `cargo run`).
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(DEFAULT_CONFIG_PATH)
}
