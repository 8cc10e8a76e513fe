//! Configuration for gaze-fixation.
//!
//! Two files are involved:
//! - the tool's own `config.json` with default algorithm parameters
//! - an optional dataset catalogue, as used by the dashboard, giving each
//!   dataset's sampling rate

use crate::core::FixationParams;
use crate::error::{require_positive, FixationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Sampling rate assumed when nothing else is configured.
pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 240.0;

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default algorithm parameters
    pub params: FixationParams,

    /// Whether scanpaths are reduced to fixations (false = raw samples)
    pub compute_fixations: bool,

    /// Sampling rate used when no dataset is selected
    pub sample_rate_hz: f64,

    /// Dataset catalogue file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_config_path: Option<PathBuf>,

    /// Dataset to take the sampling rate from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            params: FixationParams::default(),
            compute_fixations: true,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            dataset_config_path: None,
            dataset: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if it is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gaze-fixation")
            .join("config.json")
    }

    /// Seconds between samples.
    ///
    /// Uses the selected dataset's rate when both a catalogue and a dataset
    /// are configured, otherwise `sample_rate_hz`.
    pub fn time_interval(&self) -> Result<f64, ConfigError> {
        match (&self.dataset_config_path, &self.dataset) {
            (Some(path), Some(name)) => {
                let catalog = DatasetCatalog::load(path)?;
                catalog.dataset(name)?.time_interval()
            }
            _ => {
                let rate = require_positive("sample_rate_hz", self.sample_rate_hz)?;
                Ok(1.0 / rate)
            }
        }
    }

    /// Check the configured parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;
        require_positive("sample_rate_hz", self.sample_rate_hz)?;
        Ok(())
    }
}

/// One dataset entry in the catalogue.
///
/// Field names follow the catalogue file (`"Sample Rate"` etc.). Unknown
/// keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    #[serde(rename = "Sample Rate")]
    pub sample_rate: f64,
    #[serde(rename = "Data Suffix", default, skip_serializing_if = "Option::is_none")]
    pub data_suffix: Option<String>,
    #[serde(rename = "Data Loader", default, skip_serializing_if = "Option::is_none")]
    pub data_loader: Option<String>,
    #[serde(rename = "Window Width", default, skip_serializing_if = "Option::is_none")]
    pub window_width: Option<u32>,
    #[serde(rename = "Window Height", default, skip_serializing_if = "Option::is_none")]
    pub window_height: Option<u32>,
}

impl DatasetEntry {
    /// `1 / sample_rate`.
    pub fn time_interval(&self) -> Result<f64, ConfigError> {
        let rate = require_positive("sample_rate", self.sample_rate)?;
        Ok(1.0 / rate)
    }
}

/// The dataset catalogue: `{"datasets": {"<name>": {...}}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetCatalog {
    pub datasets: BTreeMap<String, DatasetEntry>,
}

impl DatasetCatalog {
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json(&content)
    }

    pub fn dataset(&self, name: &str) -> Result<&DatasetEntry, ConfigError> {
        self.datasets
            .get(name)
            .ok_or_else(|| ConfigError::UnknownDataset(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    UnknownDataset(String),
    Invalid(FixationError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
            ConfigError::UnknownDataset(name) => write!(f, "Unknown dataset: {name}"),
            ConfigError::Invalid(e) => write!(f, "Invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FixationError> for ConfigError {
    fn from(e: FixationError) -> Self {
        ConfigError::Invalid(e)
    }
}
