//! Limit stores.

use holdwatch_core::HoldDuration;
use parking_lot::Mutex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::document::{LimitsDocument, Upserted};
use crate::error::{PersistenceError, PersistenceResult};

/// Persistent home of the limits document.
///
/// Reads never fail: a missing or unreadable document reads as the
/// default. Edits are validated before anything is written; a rejected
/// edit, or any edit of an unreadable document, leaves the stored
/// document untouched.
pub trait LimitStore: Send + Sync {
    fn load(&self) -> LimitsDocument;

    fn upsert(&self, coin: &str, time: &str) -> PersistenceResult<Upserted>;

    fn remove(&self, coin: &str) -> PersistenceResult<bool>;

    fn set_check_interval(&self, text: &str) -> PersistenceResult<HoldDuration>;
}

/// JSON file store. Writes go to a sibling temp file that is then renamed
/// over the target.
pub struct JsonLimitStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonLimitStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!(path = %path.display(), "Using limits file");
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> LimitsDocument {
        self.try_read().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Unreadable limits file, using defaults");
            LimitsDocument::default()
        })
    }

    /// The stored document; a missing or empty file is the default.
    fn try_read(&self) -> PersistenceResult<LimitsDocument> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Limits file not found, using defaults");
                return Ok(LimitsDocument::default());
            }
            Err(e) => return Err(e.into()),
        };

        if data.trim().is_empty() {
            return Ok(LimitsDocument::default());
        }

        let mut doc = serde_json::from_str::<LimitsDocument>(&data).map_err(|e| {
            PersistenceError::Corrupt {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        if doc.check_interval.trim().is_empty() {
            doc.check_interval = LimitsDocument::default().check_interval;
        }
        debug!(count = doc.limits.len(), check_interval = %doc.check_interval, "Loaded limits");
        Ok(doc)
    }

    /// Read-modify-write under the store lock.
    fn edit<R>(
        &self,
        f: impl FnOnce(&mut LimitsDocument) -> PersistenceResult<R>,
    ) -> PersistenceResult<R> {
        let _guard = self.lock.lock();
        let mut doc = match self.try_read() {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Refusing to edit unreadable limits file");
                return Err(e);
            }
        };
        let out = f(&mut doc)?;
        self.write(&doc)?;
        Ok(out)
    }

    fn write(&self, doc: &LimitsDocument) -> PersistenceResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let json = serde_json::to_string_pretty(doc)?;
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        debug!(count = doc.limits.len(), "Saved limits");
        Ok(())
    }
}

impl LimitStore for JsonLimitStore {
    fn load(&self) -> LimitsDocument {
        let _guard = self.lock.lock();
        self.read()
    }

    fn upsert(&self, coin: &str, time: &str) -> PersistenceResult<Upserted> {
        self.edit(|doc| doc.upsert(coin, time))
    }

    fn remove(&self, coin: &str) -> PersistenceResult<bool> {
        self.edit(|doc| doc.remove(coin))
    }

    fn set_check_interval(&self, text: &str) -> PersistenceResult<HoldDuration> {
        self.edit(|doc| doc.set_check_interval(text))
    }
}

/// In-process store, for tests and dry runs.
#[derive(Default)]
pub struct MemoryLimitStore {
    doc: Mutex<LimitsDocument>,
}

impl MemoryLimitStore {
    pub fn new(doc: LimitsDocument) -> Self {
        Self {
            doc: Mutex::new(doc),
        }
    }
}

impl LimitStore for MemoryLimitStore {
    fn load(&self) -> LimitsDocument {
        self.doc.lock().clone()
    }

    fn upsert(&self, coin: &str, time: &str) -> PersistenceResult<Upserted> {
        self.doc.lock().upsert(coin, time)
    }

    fn remove(&self, coin: &str) -> PersistenceResult<bool> {
        self.doc.lock().remove(coin)
    }

    fn set_check_interval(&self, text: &str) -> PersistenceResult<HoldDuration> {
        self.doc.lock().set_check_interval(text)
    }
}
