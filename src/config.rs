//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default TTL in seconds for entries stored without explicit TTL
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Seconds between two sweeps of expired entries
    pub cleanup_interval: u64,
    /// Seconds to wait before retrying after a failed sweep
    pub cleanup_retry_interval: u64,
    /// Directory holding the static reference JSON files
    pub data_dir: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 604800, seven days)
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 3600)
    /// - `CLEANUP_RETRY_INTERVAL` - Retry delay after a failed sweep (default: 300)
    /// - `DATA_DIR` - Reference data directory (default: `data`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            cleanup_retry_interval: env_or(
                "CLEANUP_RETRY_INTERVAL",
                defaults.cleanup_retry_interval,
            ),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        }
    }

    /// Rejects values the service cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.default_ttl == 0 {
            return Err(CacheError::InvalidTtl(
                "DEFAULT_TTL must be greater than zero".to_string(),
            ));
        }
        if self.cleanup_interval == 0 || self.cleanup_retry_interval == 0 {
            return Err(CacheError::InvalidRequest(
                "cleanup intervals must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: 86_400 * 7,
            server_port: 8000,
            cleanup_interval: 3600,
            cleanup_retry_interval: 300,
            data_dir: PathBuf::from("data"),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_ttl, 604_800);
        assert_eq!(config.server_port, 8000);
        assert_eq!(config.cleanup_interval, 3600);
        assert_eq!(config.cleanup_retry_interval, 300);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("DEFAULT_TTL");
        env::remove_var("SERVER_PORT");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("CLEANUP_RETRY_INTERVAL");
        env::remove_var("DATA_DIR");

        let config = Config::from_env();
        assert_eq!(config.default_ttl, 604_800);
        assert_eq!(config.server_port, 8000);
        assert_eq!(config.cleanup_interval, 3600);
        assert_eq!(config.cleanup_retry_interval, 300);
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let config = Config {
            default_ttl: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(CacheError::InvalidTtl(_))));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = Config {
            cleanup_retry_interval: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
