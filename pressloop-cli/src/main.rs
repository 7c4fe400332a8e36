mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::args::{PollArgs, SettingsArgs};
use cli::{config_handlers, handlers, record_handlers};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pressloop")]
#[command(version)]
#[command(about = "Send a chat button prompt, wait for the press, report it to a table")]
#[command(
    help_template = "{name} - {version}\n{about}\n\n{usage-heading}\n  {usage}\n\n{all-args}{options}\n"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send the button prompt to the configured chat
    ///
    /// Prints the chat API response as JSON. Requires PRESSLOOP_BOT_TOKEN.
    Notify {
        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Check once for a new press of the prompt's button
    ///
    /// Exit status 0 means a new press was captured and written to the record
    /// file; exit status 1 means nothing new yet (or, with --wait, that the
    /// sensor timeout elapsed). Schedulers re-run this until it succeeds.
    /// Exit status 2 means the tick failed (chat API, network, unreadable or
    /// corrupt record) and re-running will not help until it is fixed. With
    /// --wait the command keeps poking on its own until a press arrives or the
    /// sensor timeout elapses.
    ///
    /// Examples:
    ///   pressloop poll
    ///   pressloop poll --wait --poke-interval 30 --timeout 3600
    Poll {
        #[command(flatten)]
        settings: SettingsArgs,

        #[command(flatten)]
        poll: PollArgs,
    },

    /// Post the captured press to the table API
    ///
    /// Prints the table API response as JSON. Requires PRESSLOOP_TABLE_TOKEN.
    /// Every run creates a new row.
    Report {
        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Inspect or reset the record file
    Record {
        #[command(subcommand)]
        command: record_handlers::RecordCommands,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: config_handlers::ConfigCommands,
    },
}

/// `poll` found nothing new, or `poll --wait` timed out.
const EXIT_WAITING: u8 = 1;
/// Any command failed.
const EXIT_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_WAITING),
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Run one command. `Ok(false)` only comes from a poll that captured nothing.
async fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Notify { settings } => handlers::handle_notify(settings).await?,
        Commands::Poll { settings, poll } => return handlers::handle_poll(settings, poll).await,
        Commands::Report { settings } => handlers::handle_report(settings).await?,
        Commands::Record { command } => record_handlers::handle_record_commands(command)?,
        Commands::Config { command } => config_handlers::handle_config_commands(command)?,
    }
    Ok(true)
}
