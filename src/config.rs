use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Provider priority order is fixed: the primary query-string API first,
/// then the header-authenticated one. A provider with no API key declines
/// at fetch time; that is not a configuration error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_newsapi")]
    pub newsapi: ProviderSettings,
    #[serde(default = "default_currents")]
    pub currents: ProviderSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Entry lifetime in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json_format: bool,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::NotFound(path.as_ref().display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, provider) in [
            ("newsapi", &self.providers.newsapi),
            ("currents", &self.providers.currents),
        ] {
            let parsed = url::Url::parse(&provider.endpoint)
                .map_err(|_| ConfigError::InvalidUrl(provider.endpoint.clone()))?;
            match parsed.scheme() {
                "http" | "https" => {}
                scheme => {
                    return Err(ConfigError::Invalid(format!(
                        "Unsupported scheme '{}' for provider {}",
                        scheme, name
                    )))
                }
            }
        }

        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::Invalid("Cache TTL must be greater than 0".to_string()));
        }

        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid("Fetch timeout must be greater than 0".to_string()));
        }

        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("NEWSAPI_API_KEY") {
            self.providers.newsapi.api_key = Some(key);
        }

        if let Ok(key) = std::env::var("CURRENTS_API_KEY") {
            self.providers.currents.api_key = Some(key);
        }

        if let Ok(ttl) = std::env::var("NEWSDESK_CACHE_TTL") {
            if let Ok(val) = ttl.parse() {
                self.cache.ttl_secs = val;
            }
        }

        if let Ok(level) = std::env::var("NEWSDESK_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_secs)
    }

    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("newsdesk"))
            .ok_or_else(|| ConfigError::Invalid("Could not determine config directory".to_string()))
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            newsapi: default_newsapi(),
            currents: default_currents(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            page_size: default_page_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

fn default_newsapi() -> ProviderSettings {
    ProviderSettings {
        endpoint: "https://newsapi.org/v2/everything".to_string(),
        api_key: None,
    }
}

fn default_currents() -> ProviderSettings {
    ProviderSettings {
        endpoint: "https://api.currentsapi.services/v1/search".to_string(),
        api_key: None,
    }
}

fn default_ttl_secs() -> u64 { 300 }
fn default_timeout() -> u64 { 10 }
fn default_page_size() -> usize { 20 }
fn default_user_agent() -> String {
    format!("newsdesk/{}", env!("CARGO_PKG_VERSION"))
}
fn default_log_level() -> String { "info".to_string() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.fetch.timeout_secs, 10);
        assert!(config.providers.newsapi.api_key.is_none());
        assert!(config.providers.newsapi.endpoint.contains("newsapi.org"));
        assert!(config.providers.currents.endpoint.contains("currentsapi"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml_src = r#"
            [providers.newsapi]
            endpoint = "https://mirror.example.com/v2/everything"
            api_key = "k123"

            [cache]
            ttl_secs = 60
        "#;

        let config: Config = toml::from_str(toml_src).unwrap();
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.providers.newsapi.api_key.as_deref(), Some("k123"));
        // Untouched sections keep their defaults.
        assert_eq!(config.fetch.timeout_secs, 10);
        assert!(config.providers.currents.endpoint.contains("currentsapi"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.cache.ttl_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.providers.newsapi.endpoint = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.providers.currents.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.providers.currents.api_key = Some("tok456".to_string());
        config.cache.ttl_secs = 120;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.cache.ttl_secs, 120);
        assert_eq!(loaded.providers.currents.api_key.as_deref(), Some("tok456"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/newsdesk/config.toml");
        assert!(matches!(result, Err(crate::error::Error::NotFound(_))));
    }
}
