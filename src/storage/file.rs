//! JSON-file backed key-value store
//!
//! Stands in for browser local storage when running natively. The whole map
//! is kept in memory and rewritten to disk after every mutation, which keeps
//! the file a plain JSON object that can be inspected or edited by hand.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::error::StorageResult;
use crate::storage::kv::KeyValueStore;

/// File name used inside the configured data directory
pub const STORE_FILE_NAME: &str = "local_storage.json";

/// Durable store persisted as a single JSON object
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: RefCell<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, creating it lazily on first write
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        let items = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!("Opened file store {:?} with {} keys", path, items.len());

        Ok(Self {
            path,
            items: RefCell::new(items),
        })
    }

    /// Open `local_storage.json` inside a data directory
    pub fn in_dir(data_dir: impl AsRef<Path>) -> StorageResult<Self> {
        Self::open(data_dir.as_ref().join(STORE_FILE_NAME))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&*self.items.borrow())?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let removed = self.items.borrow_mut().remove(key);
        if removed.is_some() {
            self.persist()?;
        }
        Ok(())
    }
}
