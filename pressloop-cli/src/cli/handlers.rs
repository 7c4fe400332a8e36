//! Handlers for the notify, poll and report commands

use anyhow::{Context, Result};
use pressloop_core::models::{secret_from_env, Configuration, BOT_TOKEN_ENV, TABLE_TOKEN_ENV};
use pressloop_core::providers::{AirtableClient, TelegramBot};
use pressloop_core::services::{logging, Notifier, PollOutcome, Poller, Reporter};
use pressloop_core::store::JsonFileRecordStore;
use std::sync::Arc;
use std::time::Duration;

use super::args::{ensure_valid, PollArgs, SettingsArgs};
use super::sensor::{run_sensor, SensorResult, SensorSettings};

fn init_logging(config: &Configuration) {
    // A second initialization only happens in tests; keep the first subscriber
    let _ = logging::init_logging(config.log_level);
}

fn telegram(config: &Configuration) -> Result<Arc<TelegramBot>> {
    let token = secret_from_env(BOT_TOKEN_ENV)?;
    Ok(Arc::new(TelegramBot::from_config(&config.chat, &token)))
}

fn sensor_settings(config: &Configuration, args: &PollArgs) -> SensorSettings {
    SensorSettings {
        poke_interval: Duration::from_secs(
            args.poke_interval
                .unwrap_or(config.sensor.poke_interval_secs)
                .max(1),
        ),
        timeout: Duration::from_secs(args.timeout.unwrap_or(config.sensor.timeout_secs)),
    }
}

pub async fn handle_notify(settings: SettingsArgs) -> Result<()> {
    let config = settings.load()?;
    init_logging(&config);
    ensure_valid(&config)?;

    let notifier = Notifier::from_config(&config, telegram(&config)?);
    let response = notifier.execute().await.context("Failed to send button prompt")?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Returns whether a new press was captured.
pub async fn handle_poll(settings: SettingsArgs, args: PollArgs) -> Result<bool> {
    let config = settings.load()?;
    init_logging(&config);
    ensure_valid(&config)?;

    let store = Arc::new(JsonFileRecordStore::new(&config.record_path));
    let poller = Poller::from_config(&config, telegram(&config)?, store);

    let outcome = if args.wait {
        let sensor = sensor_settings(&config, &args);
        tracing::info!(
            button_marker = %poller.expected_marker(),
            poke_interval_secs = sensor.poke_interval.as_secs(),
            timeout_secs = sensor.timeout.as_secs(),
            "Waiting for button press"
        );
        match run_sensor(sensor, || poller.poke()).await? {
            SensorResult::Matched { outcome, pokes } => {
                tracing::info!(pokes = pokes, "Button press captured");
                Some(outcome)
            }
            SensorResult::TimedOut { pokes } => {
                eprintln!("Timed out after {} pokes without a new button press", pokes);
                None
            }
        }
    } else {
        Some(poller.poke().await.context("Poll tick failed")?)
    };

    match outcome {
        Some(outcome) => {
            print_outcome(&outcome, args.json)?;
            Ok(outcome.matched())
        }
        None => Ok(false),
    }
}

fn print_outcome(outcome: &PollOutcome, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "matched": outcome.matched(),
            "record": outcome.record,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if outcome.matched() {
        println!("matched update_id={}", outcome.record.update_id);
    } else {
        println!("waiting (stored update_id={})", outcome.record.update_id);
    }
    Ok(())
}

pub async fn handle_report(settings: SettingsArgs) -> Result<()> {
    let config = settings.load()?;
    init_logging(&config);

    config.require_table_url()?;
    let token = secret_from_env(TABLE_TOKEN_ENV)?;
    let table = AirtableClient::from_config(&config.table, &token);
    let store = Arc::new(JsonFileRecordStore::new(&config.record_path));

    let response = Reporter::new(store, Arc::new(table))
        .execute()
        .await
        .context("Failed to report button press")?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
