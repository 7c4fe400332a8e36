//! Table reporter: forwards the captured press as one table row

use crate::error::{PressloopError, Result};
use crate::models::record::timestamp_format;
use crate::models::MatchRecord;
use crate::providers::{TableApi, TableFields, BUTTON_PRESS_EVENT};
use crate::services::logging;
use crate::store::RecordStore;
use serde_json::Value;
use std::sync::Arc;

/// Map a captured record onto the table's columns. The button marker is
/// reported as `reporter_name`.
pub fn table_fields(record: &MatchRecord) -> Option<TableFields> {
    let press = record.press.as_ref()?;
    Some(TableFields {
        chat_id: press.chat_id.clone(),
        username: press.username.clone(),
        triggered_at: press
            .triggered_at
            .format(timestamp_format::FORMAT)
            .to_string(),
        event_type: BUTTON_PRESS_EVENT.to_string(),
        reporter_name: press.button_marker.clone(),
    })
}

/// Reads the record and posts it. Not idempotent: every run creates a row.
pub struct Reporter {
    store: Arc<dyn RecordStore>,
    table: Arc<dyn TableApi>,
}

impl Reporter {
    pub fn new(store: Arc<dyn RecordStore>, table: Arc<dyn TableApi>) -> Self {
        Self { store, table }
    }

    pub async fn execute(&self) -> Result<Value> {
        let record = self.store.load()?;
        let fields = table_fields(&record).ok_or_else(|| PressloopError::NoButtonPress {
            path: self.store.location(),
        })?;

        let response = self.table.create_record(&fields).await.inspect_err(|e| {
            logging::log_error("reporter", &e.to_string());
        })?;
        tracing::info!(
            update_id = record.update_id,
            reporter_name = %fields.reporter_name,
            result = %response,
            "Reported button press"
        );
        Ok(response)
    }
}
