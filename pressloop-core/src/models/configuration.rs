//! Configuration data structures

use crate::error::{PressloopError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the chat-bot token. Never written to disk.
pub const BOT_TOKEN_ENV: &str = "PRESSLOOP_BOT_TOKEN";
/// Environment variable holding the table API token. Never written to disk.
pub const TABLE_TOKEN_ENV: &str = "PRESSLOOP_TABLE_TOKEN";

pub const DEFAULT_CHAT_API_BASE: &str = "https://api.telegram.org";

/// Logging level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogLevel {
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "info")]
    #[default]
    Info,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "trace")]
    Trace,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Logging verbosity level
    pub log_level: LogLevel,
    /// Path of the single-slot match record
    pub record_path: PathBuf,
    pub chat: ChatConfig,
    pub table: TableConfig,
    pub sensor: SensorConfig,
}

/// Chat bot settings (Telegram Bot API shape)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// API root, without the `/bot<token>` suffix
    pub api_base: String,
    /// Destination chat for the prompt; copied into every captured record
    pub chat_id: String,
    /// Correlation token carried by the prompt's button
    pub button_marker: String,
    pub prompt_text: String,
    pub button_text: String,
    pub send_timeout_secs: u64,
    pub updates_timeout_secs: u64,
}

/// Tabular database settings (Airtable shape)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Full table endpoint that accepts `POST {fields: {...}}`
    pub url: String,
    pub timeout_secs: u64,
}

/// In-process sensor loop used by `poll --wait`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub poke_interval_secs: u64,
    pub timeout_secs: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            record_path: PathBuf::from("button_press.json"),
            chat: ChatConfig::default(),
            table: TableConfig::default(),
            sensor: SensorConfig::default(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_CHAT_API_BASE.to_string(),
            chat_id: String::new(),
            button_marker: String::new(),
            prompt_text: "Поехали?".to_string(),
            button_text: "Поехали".to_string(),
            send_timeout_secs: 5,
            updates_timeout_secs: 3,
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: 5,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            poke_interval_secs: 60,
            timeout_secs: 60 * 60 * 24 * 7, // 7 days
        }
    }
}

impl Configuration {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                PressloopError::Config(format!("cannot read {}: {}", path.display(), e))
            })?;
            toml::from_str(&content).map_err(|e| {
                PressloopError::Config(format!("cannot parse {}: {}", path.display(), e))
            })
        } else {
            // Return default configuration if file doesn't exist
            Ok(Configuration::default())
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PressloopError::Config(format!("cannot serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PressloopError::Config(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }
        std::fs::write(path, content).map_err(|e| {
            PressloopError::Config(format!("cannot write {}: {}", path.display(), e))
        })
    }

    /// Get the XDG config directory path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            PressloopError::Config("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("pressloop").join("config.toml"))
    }

    /// Validate configuration values, reporting every problem at once
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.chat.chat_id.trim().is_empty() {
            errors.push("chat.chat_id must be set".to_string());
        }
        if self.chat.button_marker.trim().is_empty() {
            errors.push("chat.button_marker must be set".to_string());
        }
        if self.chat.button_text.is_empty() {
            errors.push("chat.button_text must not be empty".to_string());
        }
        if url::Url::parse(&self.chat.api_base).is_err() {
            errors.push(format!("chat.api_base is not a valid URL: {}", self.chat.api_base));
        }
        if self.chat.send_timeout_secs == 0 || self.chat.updates_timeout_secs == 0 {
            errors.push("chat timeouts must be greater than zero".to_string());
        }

        if self.table.timeout_secs == 0 {
            errors.push("table.timeout_secs must be greater than zero".to_string());
        }
        // The table URL is only required by the reporter; see require_table_url
        if !self.table.url.is_empty() && url::Url::parse(&self.table.url).is_err() {
            errors.push(format!("table.url is not a valid URL: {}", self.table.url));
        }

        if self.sensor.poke_interval_secs == 0 {
            errors.push("sensor.poke_interval_secs must be greater than zero".to_string());
        }

        if self.record_path.as_os_str().is_empty() {
            errors.push("record_path must be set".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn require_table_url(&self) -> Result<&str> {
        if self.table.url.is_empty() {
            return Err(PressloopError::Config("table.url must be set".to_string()));
        }
        Ok(&self.table.url)
    }
}

/// Read a secret from the environment, rejecting unset or blank values.
pub fn secret_from_env(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PressloopError::Config(format!("{} not set", var))),
    }
}
