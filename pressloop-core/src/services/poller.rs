//! Button press poller
//!
//! One call to [`Poller::poke`] is one poll tick: fetch every buffered update,
//! pick the last event carrying the expected marker, and persist it only when its
//! update id is strictly greater than the stored one. The chat API returns all
//! buffered updates on every call, so that comparison is what keeps a single
//! press from being reported on every later tick.
//!
//! The poller does not retry or sleep. The scheduler re-invokes it until it
//! reports [`PollState::Matched`] or its own timeout elapses.

use crate::error::Result;
use crate::models::{ButtonPress, Configuration, MatchRecord, UpdateEvent};
use crate::providers::ChatApi;
use crate::services::logging;
use crate::store::RecordStore;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// No qualifying press was persisted by this tick
    Waiting,
    /// A new qualifying press was persisted by this tick
    Matched,
}

/// Result of one poll tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    pub state: PollState,
    /// Record held in the slot after the tick
    pub record: MatchRecord,
}

impl PollOutcome {
    pub fn matched(&self) -> bool {
        self.state == PollState::Matched
    }
}

/// Scan updates in API order; the last event with the expected marker wins.
pub fn select_candidate(
    updates: &[UpdateEvent],
    expected_marker: &str,
    chat_id: &str,
) -> Option<MatchRecord> {
    updates
        .iter()
        .rfind(|event| event.matches(expected_marker))
        .map(|event| {
            MatchRecord::captured(
                event.update_id,
                ButtonPress {
                    chat_id: chat_id.to_string(),
                    username: event.username.clone(),
                    button_marker: event.button_marker.clone(),
                    triggered_at: event.timestamp,
                },
            )
        })
}

/// Decide whether `candidate` replaces `stored`.
///
/// Returns the record to persist (if any) and the tick's state. The marker is
/// compared again after the id check: `Matched` requires both.
pub fn evaluate(
    candidate: Option<MatchRecord>,
    stored: &MatchRecord,
    expected_marker: &str,
) -> (Option<MatchRecord>, PollState) {
    match candidate {
        Some(candidate) if stored.is_superseded_by(candidate.update_id) => {
            let marker_matches = candidate
                .press
                .as_ref()
                .is_some_and(|press| press.button_marker == expected_marker);
            let state = if marker_matches {
                PollState::Matched
            } else {
                PollState::Waiting
            };
            (Some(candidate), state)
        }
        _ => (None, PollState::Waiting),
    }
}

pub struct Poller {
    chat: Arc<dyn ChatApi>,
    store: Arc<dyn RecordStore>,
    chat_id: String,
    expected_marker: String,
}

impl Poller {
    pub fn new(
        chat: Arc<dyn ChatApi>,
        store: Arc<dyn RecordStore>,
        chat_id: impl Into<String>,
        expected_marker: impl Into<String>,
    ) -> Self {
        Self {
            chat,
            store,
            chat_id: chat_id.into(),
            expected_marker: expected_marker.into(),
        }
    }

    pub fn from_config(
        config: &Configuration,
        chat: Arc<dyn ChatApi>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self::new(
            chat,
            store,
            config.chat.chat_id.clone(),
            config.chat.button_marker.clone(),
        )
    }

    pub fn expected_marker(&self) -> &str {
        &self.expected_marker
    }

    /// Run one poll tick.
    pub async fn poke(&self) -> Result<PollOutcome> {
        let updates = self.chat.get_updates().await?;
        let candidate = select_candidate(&updates, &self.expected_marker, &self.chat_id);

        self.store.ensure()?;
        let stored = self.store.load()?;

        tracing::debug!(
            provider = self.chat.name(),
            updates = updates.len(),
            candidate_update_id = candidate.as_ref().map(|c| c.update_id),
            stored_update_id = stored.update_id,
            button_marker = %self.expected_marker,
            "Poking for button press"
        );

        let (to_persist, state) = evaluate(candidate, &stored, &self.expected_marker);
        let record = match to_persist {
            Some(record) => {
                self.store.save(&record)?;
                tracing::info!(
                    update_id = record.update_id,
                    chat_id = %self.chat_id,
                    path = %self.store.location(),
                    "Persisted button press"
                );
                record
            }
            None => stored,
        };

        if state == PollState::Matched {
            logging::log_unit_event("poller", "matched", Some(&self.expected_marker));
        }

        Ok(PollOutcome { state, record })
    }
}
