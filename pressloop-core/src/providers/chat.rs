//! Chat API seam: outbound button prompts and inbound press updates

use crate::error::Result;
use crate::models::UpdateEvent;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Message with a single inline button whose callback data is the marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonPrompt {
    pub chat_id: String,
    pub text: String,
    pub button_text: String,
    pub button_marker: String,
    pub parse_mode: String,
    pub disable_notification: bool,
}

impl ButtonPrompt {
    pub fn new(
        chat_id: impl Into<String>,
        text: impl Into<String>,
        button_text: impl Into<String>,
        button_marker: impl Into<String>,
    ) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            button_text: button_text.into(),
            button_marker: button_marker.into(),
            parse_mode: "Markdown".to_string(),
            disable_notification: true,
        }
    }

    /// `sendMessage` body with a one-row, one-button inline keyboard.
    pub fn payload(&self) -> Value {
        json!({
            "chat_id": self.chat_id,
            "text": self.text,
            "reply_markup": {
                "inline_keyboard": [[{
                    "text": self.button_text,
                    "callback_data": self.button_marker,
                }]]
            },
            "parse_mode": self.parse_mode,
            "disable_notification": self.disable_notification,
        })
    }
}

/// Chat bot API as seen by the notifier and poller.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Provider name for logging (e.g. "telegram").
    fn name(&self) -> &str;

    /// Fetch every buffered button-press update, in API order.
    async fn get_updates(&self) -> Result<Vec<UpdateEvent>>;

    /// Send a button prompt; returns the raw API response for logging.
    async fn send_prompt(&self, prompt: &ButtonPrompt) -> Result<Value>;
}
