// * Persisted user configuration
// * The store is an opaque get/set surface; a missing API key means local-only mode.

pub mod constants;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

// * Storage key the configuration lives under
pub const CONFIG_KEY: &str = "tldrConfig";

/// Summarization provider selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Openai,
    Azure,
    Custom,
    /// Any provider name this build does not know; routed like OpenAI
    #[serde(other)]
    Unknown,
}

/// User configuration as persisted by the settings surface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserConfig {
    pub provider: Provider,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

impl UserConfig {
    /// Returns the API key when one is configured and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// True when no API key is set and analysis must stay local
    pub fn is_local_only(&self) -> bool {
        self.api_key().is_none()
    }

    /// Returns the configured endpoint when non-blank
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// Returns the configured model or the default
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(constants::DEFAULT_MODEL)
    }
}

/// Errors raised by configuration stores
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config store lock poisoned")]
    Poisoned,
}

/// Key-value style configuration storage
pub trait ConfigStore: Send + Sync {
    /// Reads the current configuration (defaults when nothing was saved)
    fn load(&self) -> Result<UserConfig, ConfigError>;

    /// Replaces the stored configuration
    fn save(&self, config: &UserConfig) -> Result<(), ConfigError>;
}

/// In-process configuration store
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    config: RwLock<UserConfig>,
}

impl MemoryConfigStore {
    pub fn new(config: UserConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<UserConfig, ConfigError> {
        self.config
            .read()
            .map(|c| c.clone())
            .map_err(|_| ConfigError::Poisoned)
    }

    fn save(&self, config: &UserConfig) -> Result<(), ConfigError> {
        let mut guard = self.config.write().map_err(|_| ConfigError::Poisoned)?;
        *guard = config.clone();
        Ok(())
    }
}

/// JSON file store, laid out as `{ "tldrConfig": { ... } }`
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<UserConfig, ConfigError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(UserConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        let mut root: serde_json::Value = serde_json::from_str(&raw)?;
        match root.get_mut(CONFIG_KEY).map(serde_json::Value::take) {
            Some(entry) if !entry.is_null() => Ok(serde_json::from_value(entry)?),
            _ => Ok(UserConfig::default()),
        }
    }

    fn save(&self, config: &UserConfig) -> Result<(), ConfigError> {
        let root = serde_json::json!({ CONFIG_KEY: config });
        std::fs::write(&self.path, serde_json::to_string_pretty(&root)?)?;
        Ok(())
    }
}
