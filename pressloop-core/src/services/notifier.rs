//! Button prompt notifier

use crate::error::Result;
use crate::models::Configuration;
use crate::providers::{ButtonPrompt, ChatApi};
use crate::services::logging;
use serde_json::Value;
use std::sync::Arc;

/// Sends the single-button prompt that the poller later waits on.
pub struct Notifier {
    chat: Arc<dyn ChatApi>,
    prompt: ButtonPrompt,
}

impl Notifier {
    pub fn new(chat: Arc<dyn ChatApi>, prompt: ButtonPrompt) -> Self {
        Self { chat, prompt }
    }

    pub fn from_config(config: &Configuration, chat: Arc<dyn ChatApi>) -> Self {
        let prompt = ButtonPrompt::new(
            config.chat.chat_id.clone(),
            config.chat.prompt_text.clone(),
            config.chat.button_text.clone(),
            config.chat.button_marker.clone(),
        );
        Self::new(chat, prompt)
    }

    pub fn prompt(&self) -> &ButtonPrompt {
        &self.prompt
    }

    /// Send the prompt once. No retry: failures go back to the scheduler.
    pub async fn execute(&self) -> Result<Value> {
        let response = self.chat.send_prompt(&self.prompt).await.inspect_err(|e| {
            logging::log_error("notifier", &e.to_string());
        })?;
        tracing::info!(
            provider = self.chat.name(),
            chat_id = %self.prompt.chat_id,
            button_marker = %self.prompt.button_marker,
            result = %response,
            "Button sent"
        );
        Ok(response)
    }
}
