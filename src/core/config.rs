use crate::core::engine::InputCurrency;
use crate::core::source::{BuiltinSource, DatasetSource, FileSource};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Alternate dataset file; the built-in snapshot is used when absent.
    pub dataset_path: Option<String>,
    /// Currency assumed for amounts when the command line doesn't say.
    #[serde(default)]
    pub default_currency: InputCurrency,
}

impl AppConfig {
    /// Loads the config from the default location, or returns defaults when
    /// no config file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "whatif", "whatif")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn dataset_source(&self) -> Box<dyn DatasetSource> {
        match &self.dataset_path {
            Some(path) => Box::new(FileSource::new(path)),
            None => Box::new(BuiltinSource),
        }
    }
}
