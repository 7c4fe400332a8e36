//! Update events scanned by the poller

use chrono::NaiveDateTime;

/// One button-press notification from the chat API.
///
/// Transient: events are scanned on every poll tick and never persisted
/// individually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEvent {
    /// Externally assigned, monotonically increasing update id
    pub update_id: i64,
    /// Sender username (falls back to the first name when the sender has none)
    pub username: String,
    /// Correlation token carried by the pressed button
    pub button_marker: String,
    /// When the message carrying the button was sent (UTC)
    pub timestamp: NaiveDateTime,
}

impl UpdateEvent {
    pub fn new(
        update_id: i64,
        username: impl Into<String>,
        button_marker: impl Into<String>,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            update_id,
            username: username.into(),
            button_marker: button_marker.into(),
            timestamp,
        }
    }

    pub fn matches(&self, expected_marker: &str) -> bool {
        self.button_marker == expected_marker
    }
}
