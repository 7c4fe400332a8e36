//! Match record persistence using a JSON file

use super::RecordStore;
use crate::error::{PressloopError, Result};
use crate::models::MatchRecord;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// JSON file holding exactly one [`MatchRecord`].
///
/// Each read and write holds an advisory lock, so readers never see a half-written
/// file. The poller's load-compare-save cycle is not atomic: run one poller per path.
pub struct JsonFileRecordStore {
    path: PathBuf,
}

impl JsonFileRecordStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_absent_or_empty(&self) -> Result<bool> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(PressloopError::record_io(&self.path, e)),
        }
    }

    fn read_locked(&self) -> Result<String> {
        let file = File::open(&self.path).map_err(|e| PressloopError::record_io(&self.path, e))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .map_err(|e| PressloopError::record_io(&self.path, e))?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        reader
            .read_to_string(&mut contents)
            .map_err(|e| PressloopError::record_io(&self.path, e))?;

        let _ = file.unlock();
        Ok(contents)
    }

    fn write_locked(&self, json: &str) -> Result<()> {
        // No truncate on open: the file is only cleared once the exclusive lock is held
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| PressloopError::record_io(&self.path, e))?;

        file.lock_exclusive()
            .map_err(|e| PressloopError::record_io(&self.path, e))?;
        file.set_len(0)
            .map_err(|e| PressloopError::record_io(&self.path, e))?;

        let mut writer = std::io::BufWriter::new(&file);
        writer
            .write_all(json.as_bytes())
            .map_err(|e| PressloopError::record_io(&self.path, e))?;
        writer
            .flush()
            .map_err(|e| PressloopError::record_io(&self.path, e))?;
        drop(writer);

        let _ = file.unlock();
        Ok(())
    }
}

impl RecordStore for JsonFileRecordStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn ensure(&self) -> Result<bool> {
        if !self.is_absent_or_empty()? {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| PressloopError::record_io(parent, e))?;
            }
        }

        self.save(&MatchRecord::sentinel())?;
        tracing::info!(path = %self.path.display(), "Initialized match record");
        Ok(true)
    }

    fn load(&self) -> Result<MatchRecord> {
        let contents = self.read_locked()?;
        serde_json::from_str(&contents).map_err(|source| PressloopError::RecordCorrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, record: &MatchRecord) -> Result<()> {
        let json = serde_json::to_string(record).map_err(|source| {
            PressloopError::RecordCorrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        self.write_locked(&json)
    }
}
