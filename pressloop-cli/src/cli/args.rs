//! Arguments shared by several subcommands

use anyhow::{Context, Result};
use clap::Args;
use pressloop_core::models::Configuration;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_ARG: &str = "~/.config/pressloop/config.toml";

/// Where to load settings from, plus per-invocation overrides
#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Path to config file
    #[arg(long, default_value = DEFAULT_CONFIG_ARG)]
    pub config: String,

    /// Destination chat id (overrides chat.chat_id)
    #[arg(long)]
    pub chat_id: Option<String>,

    /// Button correlation marker (overrides chat.button_marker)
    #[arg(long)]
    pub button_marker: Option<String>,

    /// Record file path (overrides record_path)
    #[arg(long)]
    pub record_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PollArgs {
    /// Keep poking until a press arrives or the sensor timeout elapses
    #[arg(long)]
    pub wait: bool,

    /// Seconds between pokes with --wait (overrides sensor.poke_interval_secs)
    #[arg(long)]
    pub poke_interval: Option<u64>,

    /// Give up after this many seconds with --wait (overrides sensor.timeout_secs)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the poll outcome as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn resolve_config_path(config_arg: &str) -> Result<PathBuf> {
    if config_arg == DEFAULT_CONFIG_ARG {
        Configuration::default_config_path().context("Config path")
    } else if let Some(rest) = config_arg.strip_prefix("~/") {
        let home = std::env::var("HOME").context("HOME not set")?;
        Ok(PathBuf::from(home).join(rest))
    } else {
        Ok(PathBuf::from(config_arg))
    }
}

impl SettingsArgs {
    /// Load the config file (defaults when absent) and apply command-line overrides.
    pub fn load(&self) -> Result<Configuration> {
        let path = resolve_config_path(&self.config)?;
        let mut config = Configuration::load_from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut Configuration) {
        if let Some(chat_id) = &self.chat_id {
            config.chat.chat_id = chat_id.clone();
        }
        if let Some(marker) = &self.button_marker {
            config.chat.button_marker = marker.clone();
        }
        if let Some(path) = &self.record_path {
            config.record_path = path.clone();
        }
    }
}

/// Fail with every validation problem listed.
pub fn ensure_valid(config: &Configuration) -> Result<()> {
    config
        .validate()
        .map_err(|errors| anyhow::anyhow!("Invalid configuration:\n  {}", errors.join("\n  ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn settings(config: &str) -> SettingsArgs {
        SettingsArgs {
            config: config.to_string(),
            chat_id: None,
            button_marker: None,
            record_path: None,
        }
    }

    #[test]
    fn test_resolve_plain_path() {
        let path = resolve_config_path("/etc/pressloop.toml").unwrap();
        assert_eq!(path, PathBuf::from("/etc/pressloop.toml"));
    }

    #[test]
    fn test_resolve_home_relative_path() {
        let home = std::env::var("HOME").unwrap();
        let path = resolve_config_path("~/pl/config.toml").unwrap();
        assert_eq!(path, PathBuf::from(home).join("pl/config.toml"));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "record_path = \"file.json\"\n[chat]\nchat_id = \"1\"\nbutton_marker = \"from-file\"\n",
        )
        .unwrap();

        let mut args = settings(path.to_str().unwrap());
        args.button_marker = Some("from-flag".to_string());
        args.record_path = Some(PathBuf::from("flag.json"));

        let config = args.load().unwrap();
        assert_eq!(config.chat.chat_id, "1");
        assert_eq!(config.chat.button_marker, "from-flag");
        assert_eq!(config.record_path, PathBuf::from("flag.json"));
    }

    #[test]
    fn test_ensure_valid_lists_problems() {
        let err = ensure_valid(&Configuration::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("chat.chat_id"));
        assert!(message.contains("chat.button_marker"));
    }
}
