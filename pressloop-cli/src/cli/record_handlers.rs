//! Record subcommands (show, reset)

use anyhow::{Context, Result};
use clap::Subcommand;
use pressloop_core::models::MatchRecord;
use pressloop_core::store::{JsonFileRecordStore, RecordStore};

use super::args::SettingsArgs;

#[derive(Subcommand)]
pub enum RecordCommands {
    /// Print the stored record as JSON
    Show {
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Reset the record to the sentinel so the next press is reported again
    Reset {
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

pub fn handle_record_commands(command: RecordCommands) -> Result<()> {
    match command {
        RecordCommands::Show { settings } => handle_record_show(&settings),
        RecordCommands::Reset { settings } => handle_record_reset(&settings),
    }
}

fn handle_record_show(settings: &SettingsArgs) -> Result<()> {
    let config = settings.load()?;
    let store = JsonFileRecordStore::new(&config.record_path);
    if !store.path().exists() {
        println!("No record at {}", store.location());
        return Ok(());
    }
    let record = store.load().context("Failed to read record")?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn handle_record_reset(settings: &SettingsArgs) -> Result<()> {
    let config = settings.load()?;
    let store = JsonFileRecordStore::new(&config.record_path);
    store
        .save(&MatchRecord::sentinel())
        .context("Failed to reset record")?;
    println!("Record at {} reset", store.location());
    Ok(())
}
