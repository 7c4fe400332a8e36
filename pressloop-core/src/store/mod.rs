//! Single-slot persistence for the last captured button press
//!
//! The poller only talks to [`RecordStore`], so the JSON file can be swapped for
//! a key-value store without touching the matching logic.

mod json_file;
mod memory;

pub use json_file::JsonFileRecordStore;
pub use memory::MemoryRecordStore;

use crate::error::Result;
use crate::models::MatchRecord;

pub trait RecordStore: Send + Sync {
    /// Human-readable location for logs and errors.
    fn location(&self) -> String;

    /// Initialize the slot with the sentinel record when it is absent or empty.
    /// Returns true when the slot was initialized by this call.
    fn ensure(&self) -> Result<bool>;

    /// Read the stored record. A present but unreadable record is an error.
    fn load(&self) -> Result<MatchRecord>;

    /// Replace the stored record.
    fn save(&self, record: &MatchRecord) -> Result<()>;
}
