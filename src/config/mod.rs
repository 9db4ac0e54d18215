// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::cache::MediaKeyStrategy;
use crate::error::{AssistError, Result};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest, prefix `PETCARE__`)
    /// 2. Config file (`path`, or `~/.petcare-assist/config.toml`)
    /// 3. Defaults (lowest)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p.to_path_buf()).required(true),
            None => File::with_name(&Self::default_config_path()).required(false),
        };

        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix("PETCARE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| AssistError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| AssistError::Config(e.to_string()))
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".petcare-assist")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn media_strategy(&self) -> MediaKeyStrategy {
        match self.media_key {
            MediaKeyMode::Prefix => MediaKeyStrategy::Prefix(self.media_prefix_len),
            MediaKeyMode::Digest => MediaKeyStrategy::Digest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.ttl(), Duration::from_secs(300));
        assert_eq!(config.cache.media_strategy(), MediaKeyStrategy::Prefix(100));
        assert_eq!(config.gemini.text_model, "gemini-1.5-pro");
        assert_eq!(config.places.radius_meters, 5000);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9191\n\n[cache]\nttl_seconds = 60\nmedia_key = \"digest\""
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.cache.ttl(), Duration::from_secs(60));
        assert_eq!(config.cache.media_strategy(), MediaKeyStrategy::Digest);
        // Untouched sections keep their defaults
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/petcare.toml")));
        assert!(result.is_err());
    }
}
