//! Config subcommands (init, show)

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use pressloop_core::models::{Configuration, BOT_TOKEN_ENV, TABLE_TOKEN_ENV};

use super::args::{resolve_config_path, SettingsArgs, DEFAULT_CONFIG_ARG};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a configuration file with default values
    Init {
        /// Path to config file
        #[arg(long, default_value = DEFAULT_CONFIG_ARG)]
        config: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show the resolved configuration and secret status (no secrets)
    Show {
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

pub fn handle_config_commands(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Init { config, force } => handle_config_init(&config, force),
        ConfigCommands::Show { settings } => handle_config_show(&settings),
    }
}

fn handle_config_init(config_arg: &str, force: bool) -> Result<()> {
    let path = resolve_config_path(config_arg)?;
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Configuration::default()
        .save_to_file(&path)
        .context("Failed to write config")?;
    println!("Wrote default configuration to {}", path.display());
    println!(
        "Set chat.chat_id and chat.button_marker, then export {} and {}",
        BOT_TOKEN_ENV, TABLE_TOKEN_ENV
    );
    Ok(())
}

fn secret_status(var: &str) -> &'static str {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => "set",
        _ => "missing",
    }
}

fn handle_config_show(settings: &SettingsArgs) -> Result<()> {
    let config = settings.load()?;
    print!("{}", toml::to_string_pretty(&config)?);
    println!();
    println!("# {}: {}", BOT_TOKEN_ENV, secret_status(BOT_TOKEN_ENV));
    println!("# {}: {}", TABLE_TOKEN_ENV, secret_status(TABLE_TOKEN_ENV));
    match config.validate() {
        Ok(()) => println!("# status: valid"),
        Err(errors) => {
            for error in errors {
                println!("# invalid: {}", error);
            }
        }
    }
    Ok(())
}
