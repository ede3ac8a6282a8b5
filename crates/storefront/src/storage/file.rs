//! JSON-file store.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::{KeyValueStore, StorageError};

/// Store persisted as a single JSON object mapping keys to string values.
///
/// The file is read on [`FileStore::open`] and rewritten on every change
/// through a temporary sibling file and a rename, so a crash mid-write leaves
/// either the old or the new contents.
///
/// Reads are served from the in-memory copy. Each write first re-reads the
/// file and applies the change on top of what is there, so two processes
/// sharing the file keep each other's keys (one saving the token, the other
/// the cart). A value changed by another process is only seen by this one
/// after its next write or a reopen, and two writes racing between read and
/// rename still end with the last rename winning; there is no file lock.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. A file that is not a JSON object of
    /// strings is also treated as empty (and logged); it is replaced on the
    /// next write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let items = read_items(&path)?.unwrap_or_default();

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `items` to disk via a temp file and rename.
    fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(items)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Apply `change` to a copy of the items, flush it, then commit it.
    fn write_with(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        let mut next = read_items(&self.path)?.unwrap_or_else(|| items.clone());
        change(&mut next);
        self.flush(&next)?;
        *items = next;
        Ok(())
    }
}

/// Current contents of the file at `path`.
///
/// `None` when the file is missing or is not a JSON object of strings (the
/// latter is logged).
fn read_items(path: &Path) -> Result<Option<BTreeMap<String, String>>, StorageError> {
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(items) => Ok(Some(items)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable store file");
                Ok(None)
            }
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Store file not found");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write_with(|items| {
            items.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.write_with(|items| {
            items.remove(key);
        })
    }
}
