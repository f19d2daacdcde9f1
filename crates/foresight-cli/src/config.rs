//! CLI configuration

use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;
use foresight_core::WeightingMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Participants per breakout group when the config does not say otherwise.
pub const DEFAULT_GROUP_SIZE: usize = 5;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Output format used when `--output` is not given
    pub output: Option<OutputFormat>,

    /// Weighting mode for `stress` when `--mode` is not given. Overrides the
    /// session file's mode.
    pub mode: Option<WeightingMode>,

    /// Workshop domain used when `--domain` is not given
    pub default_domain: Option<String>,

    /// Participants per breakout group
    pub group_size: Option<usize>,
}

impl CliConfig {
    /// Load configuration from file. A missing file yields the defaults.
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: CliConfig =
                toml::from_str(&contents).map_err(|e| CliError::Config(e.to_string()))?;
            if config.group_size == Some(0) {
                return Err(CliError::Config("group_size must be at least 1".into()));
            }
            Ok(config)
        } else {
            Ok(CliConfig::default())
        }
    }

    pub fn group_size(&self) -> usize {
        self.group_size.unwrap_or(DEFAULT_GROUP_SIZE)
    }

    /// Get the default configuration file path
    fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("foresight").join("config.toml"))
    }
}
