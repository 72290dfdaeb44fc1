//! Key-Value Storage
//!
//! Durable string-keyed storage shared by every stateful component:
//!
//! - **kv**: The `KeyValueStore` port, an in-memory store and JSON helpers
//! - **file**: JSON-file backed store used by the native CLI
//! - **error**: Error types
//!
//! In the browser the same port is implemented over `window.localStorage`
//! by the UI crate, so the auth, theme and transaction modules never know
//! which substrate they run on.
//!
//! # Layout
//!
//! ```text
//! users          → JSON array of UserRecord
//! loggedInUser   → plain email string
//! selectedTheme  → plain theme name
//! transactions   → JSON map of email → [TransactionRecord]
//! ```

pub mod error;
#[cfg(feature = "native")]
pub mod file;
pub mod kv;

pub use error::{StorageError, StorageResult};
#[cfg(feature = "native")]
pub use file::FileStore;
pub use kv::{keys, read_json, write_json, KeyValueStore, MemoryStore, SharedStore};
