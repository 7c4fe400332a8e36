use super::RecordStore;
use crate::error::Result;
use crate::models::MatchRecord;
use std::sync::Mutex;

/// In-memory slot for tests.
#[derive(Default)]
pub struct MemoryRecordStore {
    slot: Mutex<Option<MatchRecord>>,
    saves: Mutex<usize>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: MatchRecord) -> Self {
        Self {
            slot: Mutex::new(Some(record)),
            saves: Mutex::new(0),
        }
    }

    pub fn current(&self) -> Option<MatchRecord> {
        self.slot.lock().unwrap().clone()
    }

    /// Number of `save` calls, including the sentinel written by `ensure`.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl RecordStore for MemoryRecordStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn ensure(&self) -> Result<bool> {
        let absent = self.slot.lock().unwrap().is_none();
        if absent {
            self.save(&MatchRecord::sentinel())?;
        }
        Ok(absent)
    }

    fn load(&self) -> Result<MatchRecord> {
        // An unset slot reads as the sentinel, matching a freshly ensured file
        Ok(self.current().unwrap_or_default())
    }

    fn save(&self, record: &MatchRecord) -> Result<()> {
        *self.slot.lock().unwrap() = Some(record.clone());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}
