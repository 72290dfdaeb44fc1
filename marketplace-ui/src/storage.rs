//! Browser localStorage adapter

use std::rc::Rc;

use marketplace::{KeyValueStore, MemoryStore, SharedStore, StorageError, StorageResult};

/// `KeyValueStore` over `window.localStorage`
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    /// The page's localStorage, if the browser exposes one
    pub fn local() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

fn unavailable(err: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Unavailable(format!("{:?}", err))
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage.get_item(key).map_err(unavailable)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage.set_item(key, value).map_err(unavailable)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.storage.remove_item(key).map_err(unavailable)
    }
}

/// localStorage when available, otherwise an in-memory store for this page
pub fn page_store() -> SharedStore {
    match BrowserStorage::local() {
        Some(storage) => Rc::new(storage) as SharedStore,
        None => {
            web_sys::console::warn_1(
                &"localStorage unavailable; state will not survive a reload".into(),
            );
            MemoryStore::shared() as SharedStore
        }
    }
}
