use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::service::ServiceKind;

/// Region used to issue DescribeRegions when none is configured
pub const DEFAULT_HOME_REGION: &str = "eu-west-1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint used for the global region listing
    pub home_region: String,
    /// Report sections, in output order
    pub services: Vec<ServiceKind>,
    /// Allow-list of regions; empty means every enabled region
    pub regions: Vec<String>,
    /// Regions fetched in parallel per listing
    pub concurrency: usize,
    /// Abort the run on the first failing service
    pub fail_fast: bool,
    pub color: bool,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per describe call when throttled; 1 disables retries
    pub max_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            home_region: DEFAULT_HOME_REGION.to_string(),
            services: ServiceKind::ALL.to_vec(),
            regions: Vec::new(),
            concurrency: 1,
            fail_fast: false,
            color: true,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

impl Config {
    /// Load from `path`, else `.ricoverage.toml`, else the user config dir.
    ///
    /// Missing files yield the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            let local = PathBuf::from(".ricoverage.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("ricoverage").join("config.toml"))
                    .unwrap_or(local)
            }
        };

        if !config_path.exists() {
            if path.is_some() {
                eprintln!("WARNING: Config file not found: {}", config_path.display());
                eprintln!("   Using default configuration. Run 'ricoverage init' to create a config file.");
            }
            return Ok(Config::default());
        }

        let content =
            std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
                path: config_path.display().to_string(),
                reason: e.to_string(),
            })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            ConfigError::ParseError(format!("{}: {}", config_path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.home_region.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "home_region".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "concurrency".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.services.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "services".to_string(),
                reason: "select at least one of cache, ec2, rds".to_string(),
            });
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}
