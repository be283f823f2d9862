//! Configuration service.
//!
//! Reads `config.toml`, writing a default one on first run.

use std::path::PathBuf;

use tgt_core::Result;
use tgt_core::config::AppConfig;

use crate::paths::{ServiceType, TgtPaths};
use crate::storage::write_atomic;

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_paths(paths: &TgtPaths) -> Result<Self> {
        Ok(Self::new(paths.get_path(ServiceType::Config)?))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Loads the configuration, creating the file with defaults if missing.
    pub fn load_or_create(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            let config = AppConfig::default();
            self.save(&config)?;
            tracing::info!("[ConfigService] Created default config at {:?}", self.path);
            return Ok(config);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        let content = toml::to_string_pretty(config)?;
        write_atomic(&self.path, content.as_bytes())
    }
}
