//! Configuration types for epic-node

use crate::cli::Cli;
use epic_txpool::PoolConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Config file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Path given
        path: String,
        /// Underlying error
        source: std::io::Error,
    },
    /// File is not valid TOML for [`NodeConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Node configuration, loaded from TOML and overridden by CLI flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Transaction pool settings
    pub pool: PoolSection,
    /// Block validation settings
    pub validation: ValidationSection,
    /// Seconds between status lines
    pub status_interval_secs: u64,
}

/// `[pool]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSection {
    /// Maximum pending transactions
    pub max_size: usize,
}

/// `[validation]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSection {
    /// Require height and previous hash to extend the tip
    pub linkage: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
            pool: PoolSection::default(),
            validation: ValidationSection::default(),
            status_interval_secs: 10,
        }
    }
}

impl Default for PoolSection {
    fn default() -> Self {
        Self {
            max_size: PoolConfig::default().max_size,
        }
    }
}

impl NodeConfig {
    /// Load from a TOML file; missing keys take defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Resolve the effective config: file (if any), then CLI overrides
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        Ok(config)
    }

    /// Overlay flags that were given on the command line
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(level) = &cli.log_level {
            self.log_level = level.clone();
        }
        if cli.log_json {
            self.log_json = true;
        }
        if let Some(max_size) = cli.max_pool_size {
            self.pool.max_size = max_size;
        }
        if cli.validate_linkage {
            self.validation.linkage = true;
        }
        if let Some(secs) = cli.status_interval {
            self.status_interval_secs = secs;
        }
    }

    /// Pool config for the transaction pool
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_size: self.pool.max_size,
        }
    }

    /// Status interval, at least one second
    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert_eq!(config.pool.max_size, 10_000);
        assert!(!config.validation.linkage);
        assert_eq!(config.status_interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
log_level = "debug"

[pool]
max_size = 32
"#,
        )
        .unwrap();

        let config = NodeConfig::load(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.pool.max_size, 32);
        assert!(!config.validation.linkage);
        assert_eq!(config.status_interval_secs, 10);
    }

    #[test]
    fn test_load_missing_file() {
        let err = NodeConfig::load(Path::new("/nonexistent/epicoin.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[pool]\nmax_size = \"many\"\n").unwrap();

        assert!(matches!(NodeConfig::load(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"status_interval_secs = 30\n[pool]\nmax_size = 32\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::parse_from([
            "epicoin-node",
            "--config", path.as_str(),
            "--max-pool-size", "8",
            "--validate-linkage",
        ]);
        let config = NodeConfig::resolve(&cli).unwrap();

        assert_eq!(config.pool.max_size, 8);
        assert!(config.validation.linkage);
        assert_eq!(config.status_interval_secs, 30);
        assert_eq!(config.pool_config().max_size, 8);
    }

    #[test]
    fn test_zero_interval_clamped() {
        let config = NodeConfig {
            status_interval_secs: 0,
            ..NodeConfig::default()
        };
        assert_eq!(config.status_interval(), Duration::from_secs(1));
    }
}
