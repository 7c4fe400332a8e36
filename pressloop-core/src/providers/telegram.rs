//! Telegram chat provider: send button prompts via sendMessage and read presses via getUpdates.

use crate::error::{PressloopError, Result};
use crate::models::{timestamp_from_epoch, ChatConfig, UpdateEvent};
use crate::providers::{ButtonPrompt, ChatApi};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Telegram Bot API client. The token is embedded in the base URL and is never logged.
pub struct TelegramBot {
    base_url: String,
    client: Arc<Client>,
    send_timeout: Duration,
    updates_timeout: Duration,
}

impl TelegramBot {
    pub fn new(api_base: &str, token: &str) -> Self {
        Self {
            base_url: format!("{}/bot{}", api_base.trim_end_matches('/'), token),
            client: Arc::new(Client::new()),
            send_timeout: Duration::from_secs(5),
            updates_timeout: Duration::from_secs(3),
        }
    }

    pub fn from_config(config: &ChatConfig, token: &str) -> Self {
        Self::new(&config.api_base, token).with_timeouts(
            Duration::from_secs(config.send_timeout_secs),
            Duration::from_secs(config.updates_timeout_secs),
        )
    }

    pub fn with_timeouts(mut self, send: Duration, updates: Duration) -> Self {
        self.send_timeout = send;
        self.updates_timeout = updates;
        self
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// POST a Bot API method and return the decoded body, rejecting non-2xx and `ok: false`.
    async fn call(&self, method: &str, body: &Value, timeout: Duration) -> Result<Value> {
        let res = self
            .client
            .post(self.endpoint(method))
            .json(body)
            .timeout(timeout)
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            let err_body = res.text().await.unwrap_or_default();
            return Err(PressloopError::ChatApi {
                method: method.to_string(),
                description: format!("{}: {}", status, describe(&err_body)),
            });
        }
        let text = res.text().await?;
        let value: Value = serde_json::from_str(&text).map_err(|e| PressloopError::ChatApi {
            method: method.to_string(),
            description: format!("{}: invalid JSON response: {}", status, e),
        })?;
        if value.get("ok").and_then(Value::as_bool) != Some(true) {
            return Err(PressloopError::ChatApi {
                method: method.to_string(),
                description: describe(&value.to_string()),
            });
        }
        Ok(value)
    }
}

/// Prefer the API's `description` field over the raw body.
fn describe(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("description").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

// --- getUpdates wire format ---

#[derive(serde::Deserialize)]
struct GetUpdatesResponse {
    #[serde(default)]
    result: Vec<TelegramUpdate>,
}

#[derive(serde::Deserialize)]
struct TelegramUpdate {
    update_id: i64,
    #[serde(default)]
    callback_query: Option<CallbackQuery>,
}

#[derive(serde::Deserialize)]
struct CallbackQuery {
    from: TelegramUser,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    message: Option<CallbackMessage>,
}

#[derive(serde::Deserialize)]
struct TelegramUser {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
}

#[derive(serde::Deserialize)]
struct CallbackMessage {
    date: i64,
}

impl TelegramUpdate {
    /// Only button presses with callback data and a dated message can become events.
    fn into_event(self) -> Option<UpdateEvent> {
        let query = self.callback_query?;
        let button_marker = query.data?;
        let timestamp = timestamp_from_epoch(query.message?.date)?;
        let username = query
            .from
            .username
            .or(query.from.first_name)
            .unwrap_or_default();
        Some(UpdateEvent {
            update_id: self.update_id,
            username,
            button_marker,
            timestamp,
        })
    }
}

fn parse_updates(body: Value) -> Result<Vec<UpdateEvent>> {
    let response: GetUpdatesResponse =
        serde_json::from_value(body).map_err(|e| PressloopError::ChatApi {
            method: "getUpdates".to_string(),
            description: format!("unexpected response shape: {}", e),
        })?;
    let total = response.result.len();
    let events: Vec<UpdateEvent> = response
        .result
        .into_iter()
        .filter_map(TelegramUpdate::into_event)
        .collect();
    tracing::debug!(
        total = total,
        button_presses = events.len(),
        "Fetched Telegram updates"
    );
    Ok(events)
}

#[async_trait]
impl ChatApi for TelegramBot {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn get_updates(&self) -> Result<Vec<UpdateEvent>> {
        let body = self
            .call("getUpdates", &serde_json::json!({}), self.updates_timeout)
            .await?;
        parse_updates(body)
    }

    async fn send_prompt(&self, prompt: &ButtonPrompt) -> Result<Value> {
        self.call("sendMessage", &prompt.payload(), self.send_timeout)
            .await
    }
}
