//! Notify, poll until pressed, then report: the full scheduler sequence over HTTP

use anyhow::Result;
use pressloop_core::models::Configuration;
use pressloop_core::providers::{AirtableClient, TelegramBot};
use pressloop_core::services::{Notifier, Poller, Reporter};
use pressloop_core::store::JsonFileRecordStore;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use warp::Filter;

const BOT_TOKEN: &str = "wf-token";
const TABLE_TOKEN: &str = "wf-table";

#[derive(Default)]
struct FakeApis {
    /// Buffered getUpdates results; never drained, like an unacknowledged bot
    updates: Vec<Value>,
    prompts: Vec<Value>,
    rows: Vec<Value>,
}

type Shared = Arc<Mutex<FakeApis>>;

fn spawn_fake_apis() -> (SocketAddr, Shared) {
    let state: Shared = Arc::new(Mutex::new(FakeApis::default()));
    let with_state = {
        let state = state.clone();
        warp::any().map(move || state.clone())
    };

    let get_updates = warp::post()
        .and(warp::path!("botwf-token" / "getUpdates"))
        .and(with_state.clone())
        .map(|state: Shared| {
            let updates = state.lock().unwrap().updates.clone();
            warp::reply::json(&json!({ "ok": true, "result": updates }))
        });

    let send_message = warp::post()
        .and(warp::path!("botwf-token" / "sendMessage"))
        .and(warp::body::json())
        .and(with_state.clone())
        .map(|body: Value, state: Shared| {
            state.lock().unwrap().prompts.push(body);
            warp::reply::json(&json!({ "ok": true, "result": { "message_id": 1 } }))
        });

    let create_row = warp::post()
        .and(warp::path!("table"))
        .and(warp::body::json())
        .and(with_state)
        .map(|body: Value, state: Shared| {
            state.lock().unwrap().rows.push(body);
            warp::reply::json(&json!({ "id": "rec1" }))
        });

    let (addr, server) = warp::serve(get_updates.or(send_message).or(create_row))
        .bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    (addr, state)
}

fn callback_update(update_id: i64, username: &str, data: &str) -> Value {
    json!({
        "update_id": update_id,
        "callback_query": {
            "id": format!("q{}", update_id),
            "from": { "id": 9, "first_name": username, "username": username },
            "data": data,
            "message": { "message_id": 1, "date": 1588336496 }
        }
    })
}

#[tokio::test]
async fn test_notify_poll_report_sequence() -> Result<()> {
    let (addr, state) = spawn_fake_apis();
    let dir = tempdir()?;

    let mut config = Configuration::default();
    config.chat.api_base = format!("http://{}", addr);
    config.chat.chat_id = "-100500".to_string();
    config.chat.button_marker = "nightly-42".to_string();
    config.table.url = format!("http://{}/table", addr);
    config.record_path = dir.path().join("press.json");
    assert!(config.validate().is_ok());

    let chat = Arc::new(TelegramBot::from_config(&config.chat, BOT_TOKEN));
    let store = Arc::new(JsonFileRecordStore::new(&config.record_path));

    // An older press of the same prompt is already buffered and already recorded
    state
        .lock()
        .unwrap()
        .updates
        .push(callback_update(40, "stale", "nightly-42"));
    std::fs::write(&config.record_path, r#"{"update_id": 40}"#)?;

    Notifier::from_config(&config, chat.clone()).execute().await?;
    let marker_sent = state.lock().unwrap().prompts[0]["reply_markup"]["inline_keyboard"][0][0]
        ["callback_data"]
        .clone();
    assert_eq!(marker_sent, "nightly-42");

    let poller = Poller::from_config(&config, chat.clone(), store.clone());
    assert!(!poller.poke().await?.matched());

    {
        let mut apis = state.lock().unwrap();
        apis.updates.push(callback_update(41, "mallory", "other-prompt"));
        apis.updates.push(callback_update(42, "alice", "nightly-42"));
    }
    let outcome = poller.poke().await?;
    assert!(outcome.matched());
    assert_eq!(outcome.record.update_id, 42);
    assert!(!poller.poke().await?.matched());

    let table = Arc::new(AirtableClient::from_config(&config.table, TABLE_TOKEN));
    Reporter::new(store, table).execute().await?;

    let rows = state.lock().unwrap().rows.clone();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0],
        json!({
            "fields": {
                "chat_id": "-100500",
                "username": "alice",
                "triggered_at": "2020-05-01 12:34:56",
                "event_type": "button_press",
                "reporter_name": "nightly-42"
            }
        })
    );

    Ok(())
}
