//! Tabular database seam and its Airtable-style HTTP client

use crate::error::{PressloopError, Result};
use crate::models::TableConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Event type tag written on every reported row.
pub const BUTTON_PRESS_EVENT: &str = "button_press";

/// Column values of one reported button press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFields {
    pub chat_id: String,
    pub username: String,
    pub triggered_at: String,
    pub event_type: String,
    pub reporter_name: String,
}

#[derive(Serialize)]
struct CreateRecordPayload<'a> {
    fields: &'a TableFields,
}

/// Destination table for reported presses.
#[async_trait]
pub trait TableApi: Send + Sync {
    /// Create one row; returns the API response for logging.
    async fn create_record(&self, fields: &TableFields) -> Result<Value>;
}

pub struct AirtableClient {
    url: String,
    token: String,
    client: Client,
    timeout: Duration,
}

impl AirtableClient {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            client: Client::new(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn from_config(config: &TableConfig, token: &str) -> Self {
        Self::new(config.url.clone(), token).with_timeout(Duration::from_secs(config.timeout_secs))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(PressloopError::TableApi {
                status,
                body: body.trim().to_string(),
            })
        }
    }
}

#[async_trait]
impl TableApi for AirtableClient {
    async fn create_record(&self, fields: &TableFields) -> Result<Value> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&CreateRecordPayload { fields })
            .timeout(self.timeout)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| PressloopError::TableApi {
            status,
            body: format!("invalid JSON response: {}: {}", e, text.trim()),
        })
    }
}
