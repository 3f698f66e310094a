use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::pip::{LookupOptions, DEFAULT_CANDIDATES, DEFAULT_MAX_DISTANCE};

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub lookup: LookupConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:5000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// Feature collection produced by the extraction step, gzipped or plain
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dist/iris.json.gz"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LookupConfig {
    pub candidates: usize,
    /// Search radius in degrees; `inf` disables it
    pub max_distance: f64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES,
            max_distance: DEFAULT_MAX_DISTANCE,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lookup.candidates == 0 {
            bail!("lookup.candidates must be at least 1");
        }
        if self.lookup.max_distance.is_nan() || self.lookup.max_distance < 0.0 {
            bail!(
                "lookup.max_distance must be a non-negative number, got {}",
                self.lookup.max_distance
            );
        }
        Ok(())
    }

    pub fn lookup_options(&self) -> LookupOptions {
        let max_distance = self.lookup.max_distance;
        LookupOptions {
            candidates: self.lookup.candidates,
            max_distance: max_distance.is_finite().then_some(max_distance),
        }
    }
}
