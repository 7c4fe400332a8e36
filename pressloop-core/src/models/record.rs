//! Durable single-slot record of the last qualifying button press

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Update id stored before any press has been captured.
pub const SENTINEL_UPDATE_ID: i64 = -1;

/// The persisted record. Serializes to `{"update_id": -1}` while no press
/// has been captured, and to a flat object with the press fields afterwards.
///
/// Reading is strict: the press fields are either all absent or all present
/// and valid. A numeric `chat_id` is accepted and kept as its decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct MatchRecord {
    pub update_id: i64,
    #[serde(flatten)]
    pub press: Option<ButtonPress>,
}

/// Details of a captured button press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonPress {
    pub chat_id: String,
    pub username: String,
    pub button_marker: String,
    #[serde(with = "timestamp_format")]
    pub triggered_at: NaiveDateTime,
}

impl MatchRecord {
    pub fn sentinel() -> Self {
        Self {
            update_id: SENTINEL_UPDATE_ID,
            press: None,
        }
    }

    pub fn captured(update_id: i64, press: ButtonPress) -> Self {
        Self {
            update_id,
            press: Some(press),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.press.is_none()
    }

    /// A candidate replaces this record only when its id is strictly greater.
    pub fn is_superseded_by(&self, candidate_update_id: i64) -> bool {
        candidate_update_id > self.update_id
    }
}

/// Chat ids are written as strings, but hand-made records may hold a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawChatId {
    Text(String),
    Number(i64),
}

impl From<RawChatId> for String {
    fn from(chat_id: RawChatId) -> Self {
        match chat_id {
            RawChatId::Text(text) => text,
            RawChatId::Number(number) => number.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawRecord {
    update_id: i64,
    chat_id: Option<RawChatId>,
    username: Option<String>,
    button_marker: Option<String>,
    triggered_at: Option<String>,
}

impl TryFrom<RawRecord> for MatchRecord {
    type Error = String;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        match (raw.chat_id, raw.username, raw.button_marker, raw.triggered_at) {
            (None, None, None, None) => Ok(Self {
                update_id: raw.update_id,
                press: None,
            }),
            (Some(chat_id), Some(username), Some(button_marker), Some(triggered_at)) => {
                let triggered_at =
                    NaiveDateTime::parse_from_str(&triggered_at, timestamp_format::FORMAT)
                        .map_err(|e| format!("invalid triggered_at '{}': {}", triggered_at, e))?;
                Ok(Self::captured(
                    raw.update_id,
                    ButtonPress {
                        chat_id: chat_id.into(),
                        username,
                        button_marker,
                        triggered_at,
                    },
                ))
            }
            _ => Err(
                "incomplete press: chat_id, username, button_marker and triggered_at \
                 must be all present or all absent"
                    .to_string(),
            ),
        }
    }
}

impl Default for MatchRecord {
    fn default() -> Self {
        Self::sentinel()
    }
}

/// Convert chat API epoch seconds into a naive UTC timestamp.
pub fn timestamp_from_epoch(secs: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

/// `YYYY-MM-DD HH:MM:SS`, the default string form of a naive timestamp.
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
