//! External API providers: the chat bot and the tabular database
//!
//! Both sit behind traits so the poller and reporter can be exercised against
//! in-memory doubles; the HTTP clients never retry.

mod chat;
mod table;
mod telegram;

pub use chat::{ButtonPrompt, ChatApi};
pub use table::{AirtableClient, TableApi, TableFields, BUTTON_PRESS_EVENT};
pub use telegram::TelegramBot;
