//! Transaction Viewer
//!
//! Per-user purchase history kept in key-value storage. Histories are mock
//! data: the first lookup for a user seeds three fixed demo purchases.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::BTreeMap;

use crate::storage::{keys, read_json, write_json, SharedStore, StorageResult};

/// One purchase in a user's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub plugin_name: String,
    /// ISO date (`YYYY-MM-DD`)
    pub date: NaiveDate,
    /// Formatted currency string, e.g. `$19.99`
    pub price: String,
}

impl TransactionRecord {
    /// Display line: date, plugin name, price
    pub fn display_line(&self) -> String {
        format!("{} - {} - {}", self.date, self.plugin_name, self.price)
    }
}

/// Email → transactions, as persisted under `transactions`
pub type TransactionBook = BTreeMap<String, Vec<TransactionRecord>>;

/// Fixed demo purchases seeded for every new user
pub fn demo_transactions() -> Vec<TransactionRecord> {
    let record = |id: &str, plugin: &str, (y, m, d): (i32, u32, u32), price: &str| {
        TransactionRecord {
            id: id.to_string(),
            plugin_name: plugin.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN),
            price: price.to_string(),
        }
    };

    vec![
        record("txn-001", "Event Horizon Reverb", (2024, 1, 15), "$29.99"),
        record("txn-002", "Singularity Synth", (2024, 2, 3), "$49.99"),
        record("txn-003", "Accretion Compressor", (2024, 3, 21), "$19.99"),
    ]
}

/// What the transaction panel should show after a toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPanel {
    pub visible: bool,
    pub lines: Vec<String>,
}

/// Loads and renders per-user transaction history
pub struct TransactionViewer {
    store: SharedStore,
    visible: Cell<bool>,
}

impl TransactionViewer {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            visible: Cell::new(false),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Transactions of the signed-in user, seeding demo data on first use
    ///
    /// Without a session the list is empty and storage is not touched.
    pub fn load_transactions(
        &self,
        current_user: Option<&str>,
    ) -> StorageResult<Vec<TransactionRecord>> {
        let Some(email) = current_user else {
            return Ok(Vec::new());
        };

        let mut book: TransactionBook =
            read_json(self.store.as_ref(), keys::TRANSACTIONS)?.unwrap_or_default();

        if let Some(existing) = book.get(email) {
            return Ok(existing.clone());
        }

        let seeded = demo_transactions();
        tracing::debug!("Seeding {} demo transactions for {}", seeded.len(), email);
        book.insert(email.to_string(), seeded.clone());
        write_json(self.store.as_ref(), keys::TRANSACTIONS, &book)?;

        Ok(seeded)
    }

    /// Re-render the full list and flip the panel's visibility
    pub fn toggle_display(&self, current_user: Option<&str>) -> StorageResult<TransactionPanel> {
        let lines = self
            .load_transactions(current_user)?
            .iter()
            .map(TransactionRecord::display_line)
            .collect();

        let visible = !self.visible.get();
        self.visible.set(visible);

        Ok(TransactionPanel { visible, lines })
    }
}
