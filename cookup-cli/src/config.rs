use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Remote favorites document store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RemoteConfig {
    /// Document endpoint base URL (e.g., "https://sync.example.com/v1")
    pub base_url: Option<String>,
    /// API key sent as a bearer token
    pub api_key: Option<String>,
}

impl RemoteConfig {
    /// Returns true if a remote endpoint is configured
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory for local state (favorites file, session)
    pub data_dir: ConfigValue<PathBuf>,
    /// Recipe API base URL
    pub api_base_url: ConfigValue<String>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    /// Remote favorites configuration
    pub remote: RemoteConfig,
}

/// Internal struct for deserializing the config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    api_base_url: Option<String>,
    remote: Option<RemoteConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut api_base_url = ConfigValue::new(
            cookup_core::DEFAULT_BASE_URL.to_string(),
            ConfigSource::Default,
        );
        let mut config_file = None;
        let mut remote = RemoteConfig::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against the config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(url) = file_config.api_base_url {
                api_base_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(remote_config) = file_config.remote {
                remote = remote_config;
            }
        }

        // Apply environment variable overrides
        if let Ok(dir) = std::env::var("COOKUP_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("COOKUP_API_URL") {
            api_base_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("COOKUP_REMOTE_URL") {
            remote.base_url = Some(url);
        }
        if let Ok(key) = std::env::var("COOKUP_REMOTE_API_KEY") {
            remote.api_key = Some(key);
        }

        Ok(Self {
            data_dir,
            api_base_url,
            config_file,
            remote,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/cookup/
    /// - macOS: ~/Library/Application Support/cookup/
    /// - Windows: %APPDATA%/cookup/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cookup")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/cookup/
    /// - macOS: ~/Library/Application Support/cookup/
    /// - Windows: %APPDATA%/cookup/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cookup")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
