//! Key-value store port
//!
//! A minimal `localStorage`-shaped interface: string keys, string values,
//! last write wins. Structured values are JSON-encoded by the helpers below.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::storage::error::StorageResult;

/// Well-known storage keys
pub mod keys {
    /// JSON array of registered users (fallback auth store)
    pub const USERS: &str = "users";
    /// Email of the signed-in user (fallback auth store)
    pub const LOGGED_IN_USER: &str = "loggedInUser";
    /// JSON identity of the signed-in hosted-provider user
    pub const IDENTITY_SESSION: &str = "identitySession";
    /// Name of the selected theme (global, not per-user)
    pub const SELECTED_THEME: &str = "selectedTheme";
    /// JSON map from owner email to transaction list
    pub const TRANSACTIONS: &str = "transactions";
}

/// Durable string-keyed storage
///
/// All operations are synchronous. Implementations are used from a single
/// thread, so interior mutability is enough and no locking is required.
pub trait KeyValueStore {
    /// Read a value, `None` if the key was never written or was removed
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// Shared handle to a store, cloned into every component that needs one
pub type SharedStore = Rc<dyn KeyValueStore>;

/// Read and decode a JSON value
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StorageResult<Option<T>> {
    match store.get_item(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON value
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set_item(key, &raw)
}

/// Ephemeral in-memory store
///
/// Used by tests and as a last-resort substrate when no durable store can be
/// opened.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared handle to a fresh store
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
