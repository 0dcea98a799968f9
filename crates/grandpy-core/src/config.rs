//! GrandPy Configuration Management
//!
//! Handles configuration from environment variables and TOML files
//! with sensible defaults for development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Google Geocoding API
    pub google: GoogleConfig,

    /// MediaWiki API
    pub wiki: WikiConfig,

    /// Outbound HTTP settings shared by both clients
    pub http: HttpConfig,

    /// Static resource locations
    pub resources: ResourceConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = parse_var("API_PORT", port)?;
        }

        // CORS origins from environment variable (comma-separated)
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Google
        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            config.google.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("GOOGLE_GEOCODE_URL") {
            config.google.url = url;
        }

        // MediaWiki
        if let Ok(url) = std::env::var("WIKI_API_URL") {
            config.wiki.url = url;
        }
        if let Ok(radius) = std::env::var("WIKI_SEARCH_RADIUS") {
            config.wiki.search_radius_m = parse_var("WIKI_SEARCH_RADIUS", radius)?;
        }

        // HTTP
        if let Ok(timeout) = std::env::var("HTTP_TIMEOUT_SECS") {
            config.http.timeout_secs = parse_var("HTTP_TIMEOUT_SECS", timeout)?;
        }

        // Resources
        if let Ok(path) = std::env::var("GRANDPY_STOP_WORDS") {
            config.resources.stop_words = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("GRANDPY_KEYWORDS") {
            config.resources.keywords = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("GRANDPY_MESSAGES") {
            config.resources.messages = PathBuf::from(path);
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(json) = std::env::var("LOG_JSON") {
            config.logging.json_format = parse_var("LOG_JSON", json)?;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;
        let defaults = Self::default();

        // Only override if env values differ from defaults
        if env_config.server.host != defaults.server.host {
            self.server.host = env_config.server.host;
        }
        if env_config.server.port != defaults.server.port {
            self.server.port = env_config.server.port;
        }
        if !env_config.server.cors_origins.is_empty() {
            self.server.cors_origins = env_config.server.cors_origins;
        }
        if env_config.google.url != defaults.google.url {
            self.google.url = env_config.google.url;
        }
        if env_config.wiki.url != defaults.wiki.url {
            self.wiki.url = env_config.wiki.url;
        }
        if env_config.wiki.search_radius_m != defaults.wiki.search_radius_m {
            self.wiki.search_radius_m = env_config.wiki.search_radius_m;
        }
        if env_config.http.timeout_secs != defaults.http.timeout_secs {
            self.http.timeout_secs = env_config.http.timeout_secs;
        }
        if env_config.resources.stop_words != defaults.resources.stop_words {
            self.resources.stop_words = env_config.resources.stop_words;
        }
        if env_config.resources.keywords != defaults.resources.keywords {
            self.resources.keywords = env_config.resources.keywords;
        }
        if env_config.resources.messages != defaults.resources.messages {
            self.resources.messages = env_config.resources.messages;
        }
        if env_config.logging.level != defaults.logging.level {
            self.logging.level = env_config.logging.level;
        }
        if env_config.logging.json_format {
            self.logging.json_format = true;
        }

        // Always use env for sensitive values
        if env_config.google.api_key.is_some() {
            self.google.api_key = env_config.google.api_key;
        }

        Ok(self)
    }

    /// Fail early when a value the clients cannot work without is absent
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.google.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingRequired("GOOGLE_API_KEY".to_string()));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_enabled: true,
            cors_origins: vec![],
        }
    }
}

/// Google Geocoding API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// Geocoding endpoint
    pub url: String,

    /// API key, normally provided through `GOOGLE_API_KEY`
    pub api_key: Option<String>,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            url: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
            api_key: None,
        }
    }
}

/// MediaWiki API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// `api.php` endpoint of the wiki
    pub url: String,

    /// Geosearch radius in meters
    pub search_radius_m: u32,

    /// Maximum number of geosearch hits (only the first one is used)
    pub search_limit: u32,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            url: "https://fr.wikipedia.org/w/api.php".to_string(),
            search_radius_m: 1000,
            search_limit: 1,
        }
    }
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent to upstream APIs
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("grandpy/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Locations of the static JSON resources
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Stop-word list
    pub stop_words: PathBuf,

    /// Address-intent detection keywords
    pub keywords: PathBuf,

    /// Canned answer pools
    pub messages: PathBuf,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            stop_words: PathBuf::from("resources/fr_stop_words.json"),
            keywords: PathBuf::from("resources/detect_words.json"),
            messages: PathBuf::from("resources/answers.json"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.wiki.search_radius_m, 1000);
        assert_eq!(config.wiki.search_limit, 1);
        assert!(config.google.api_key.is_none());
    }

    #[test]
    fn test_from_file_partial_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[wiki]
url = "https://en.wikipedia.org/w/api.php"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.wiki.url, "https://en.wikipedia.org/w/api.php");
        assert_eq!(config.wiki.search_radius_m, 1000);
    }

    #[test]
    fn test_from_file_missing() {
        let err = AppConfig::from_file("/nonexistent/grandpy.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileReadError { .. }));
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_validate_requires_api_key() {
        let mut config = AppConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired(_))
        ));

        config.google.api_key = Some("secret".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        let err = parse_var::<u16>("API_PORT", "eighty".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for API_PORT: eighty");
    }
}
