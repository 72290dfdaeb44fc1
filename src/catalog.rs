//! Plugin catalog
//!
//! The marketplace listing grouped by category. Filter buttons switch which
//! category is shown; exactly one category (and its button) is active.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Listing categories, in button order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Effects,
    Instruments,
    Utilities,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Effects, Category::Instruments, Category::Utilities];

    /// Filter key, as carried by the filter buttons
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Effects => "effects",
            Category::Instruments => "instruments",
            Category::Utilities => "utilities",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Effects => "Effects",
            Category::Instruments => "Instruments",
            Category::Utilities => "Utilities",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// One plugin for sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginListing {
    pub name: String,
    pub category: Category,
    pub price: String,
    pub description: String,
}

impl PluginListing {
    fn new(name: &str, category: Category, price: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            category,
            price: price.to_string(),
            description: description.to_string(),
        }
    }
}

/// Built-in marketplace listing
pub fn default_listings() -> Vec<PluginListing> {
    vec![
        PluginListing::new("Event Horizon Reverb", Category::Effects, "$29.99", "Infinite tails that never quite escape."),
        PluginListing::new("Accretion Compressor", Category::Effects, "$19.99", "Glue that pulls every transient inward."),
        PluginListing::new("Redshift Delay", Category::Effects, "$24.99", "Echoes that stretch as they fade."),
        PluginListing::new("Singularity Synth", Category::Instruments, "$49.99", "Dense wavetables collapsed into one voice."),
        PluginListing::new("Quasar Keys", Category::Instruments, "$39.99", "Bright electric piano with a cosmic shimmer."),
        PluginListing::new("Orbit Tuner", Category::Utilities, "$9.99", "Precise pitch detection for any source."),
        PluginListing::new("Gravity Meter", Category::Utilities, "$14.99", "Loudness metering with true-peak weight."),
    ]
}

/// Listing plus the active filter
#[derive(Debug)]
pub struct Catalog {
    listings: Vec<PluginListing>,
    active: Cell<Category>,
}

impl Catalog {
    pub fn new(listings: Vec<PluginListing>) -> Self {
        Self {
            listings,
            active: Cell::new(Category::ALL[0]),
        }
    }

    pub fn active(&self) -> Category {
        self.active.get()
    }

    /// Whether a filter button (and its category section) is active
    pub fn is_active(&self, category: Category) -> bool {
        self.active.get() == category
    }

    /// A filter button was clicked
    pub fn select(&self, category: Category) {
        self.active.set(category);
    }

    /// Listings of the active category
    pub fn visible(&self) -> Vec<&PluginListing> {
        self.in_category(self.active())
    }

    pub fn in_category(&self, category: Category) -> Vec<&PluginListing> {
        self.listings
            .iter()
            .filter(|l| l.category == category)
            .collect()
    }

    pub fn listings(&self) -> &[PluginListing] {
        &self.listings
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(default_listings())
    }
}
