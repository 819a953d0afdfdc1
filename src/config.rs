//! Configuration management for Send-to-Kindle
//!
//! Settings come from an optional `config.toml` in the working directory,
//! overridden by `SENDTOKINDLE_*` environment variables.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Uploads above this size are rejected unless configured otherwise
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 512;

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Storage directory; empty selects `~/.sendtokindle`
    /// Environment: SENDTOKINDLE_STORAGE_DIR
    pub storage_dir: String,

    /// Maximum upload size in MiB
    /// Environment: SENDTOKINDLE_MAX_UPLOAD_MB
    pub max_upload_mb: u64,
}

impl AppConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("config").required(false))
                .add_source(Environment::with_prefix("SENDTOKINDLE")),
        )
    }

    /// Build from caller-supplied sources, filling in defaults
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: AppConfig = builder
            .set_default("storage_dir", "")?
            .set_default("max_upload_mb", DEFAULT_MAX_UPLOAD_MB as i64)?
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_upload_mb == 0 {
            return Err(ConfigError::Message(
                "max_upload_mb must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Explicitly configured storage directory, if any
    pub fn storage_dir(&self) -> Option<&str> {
        let dir = self.storage_dir.trim();
        (!dir.is_empty()).then_some(dir)
    }

    /// Get maximum upload size in bytes
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_dir: String::new(),
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
        }
    }
}
