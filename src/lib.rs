//! # Marketplace
//!
//! Client-side logic for a themed plugin marketplace: account sign-up and
//! sign-in against a local registry or a hosted identity provider, per-user
//! theme preferences, a demo purchase history, a category-filtered plugin
//! catalog, and an animated particle background.
//!
//! ## Modules
//!
//! - [`storage`]: String key-value store port with memory and file adapters
//! - [`events`]: Single-threaded observer used for session and theme changes
//! - [`auth`]: The `AuthBackend` capability and its two implementations
//! - [`theme`]: Themes, palettes and the persisted theme preference
//! - [`transactions`]: Per-user purchase history
//! - [`catalog`]: Plugin listing with category filters
//! - [`particles`]: Particle field simulation and frame rendering
//! - [`binder`]: Session-driven page updates and form handlers
//! - [`app`]: Composition root and backend selection
//! - [`config`]: TOML/env configuration (native builds)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use marketplace::*;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileStore::in_dir("./marketplace_data")?;
//!     let app = Marketplace::new(
//!         std::rc::Rc::new(store),
//!         BackendKind::Local,
//!         &IdentityConfig::default(),
//!     );
//!
//!     let backend = app.backend();
//!     backend.sign_up("ana@example.com", "secret1", "secret1").await?;
//!     backend.sign_in("ana@example.com", "secret1").await?;
//!
//!     app.themes().apply_theme(Theme::Nebula)?;
//!     for record in app.transactions().load_transactions(Some("ana@example.com"))? {
//!         println!("{}", record.display_line());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod auth;
pub mod binder;
pub mod catalog;
#[cfg(feature = "native")]
pub mod config;
pub mod events;
pub mod particles;
pub mod storage;
pub mod theme;
pub mod transactions;

// Re-export top-level types for convenience
pub use storage::{
    keys, read_json, write_json, KeyValueStore, MemoryStore, SharedStore, StorageError,
    StorageResult,
};

#[cfg(feature = "native")]
pub use storage::FileStore;

pub use events::{Publisher, SubscriptionId};

pub use auth::{
    AuthBackend, AuthError, AuthResult, IdentityConfig, IdentityProvider, LocalAuthStore,
    ProfileDocument, Session, UserRecord, ValidationError, MIN_PASSWORD_LEN,
};

pub use theme::{
    Palette, PaletteSource, Rgba, SettingsModal, Theme, ThemeChanged, ThemeError, ThemeManager,
    PALETTE_VARIABLES,
};

pub use transactions::{demo_transactions, TransactionPanel, TransactionRecord, TransactionViewer};

pub use catalog::{default_listings, Catalog, Category, PluginListing};

pub use particles::{AsciiSurface, FieldConfig, Particle, ParticleField, Renderer, Surface};

pub use binder::{
    Control, Notice, NoticeKind, Page, PageView, SessionBinder, SignInForm, SignUpForm,
    NOTICE_TIMEOUT, REDIRECT_DELAY,
};

pub use app::{select_backend, BackendKind, Marketplace};

#[cfg(feature = "native")]
pub use config::{
    generate_default_config, AuthConfig, Config, ConfigError, LoadNote, LoadedConfig,
    LoggingConfig, StorageConfig as ConfigStorageConfig,
};
