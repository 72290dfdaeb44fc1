//! Composition root
//!
//! Builds the component graph once per page (or CLI run): one storage port,
//! exactly one auth backend, the theme manager, the transaction viewer and
//! the catalog. Front ends bind a `PageView` to it and draw particles with a
//! renderer whose palette follows the theme manager.

use serde::Deserialize;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::auth::{AuthBackend, AuthResult, IdentityConfig, IdentityProvider, LocalAuthStore};
use crate::binder::{PageView, SessionBinder};
use crate::catalog::Catalog;
use crate::particles::{FieldConfig, Renderer};
use crate::storage::SharedStore;
use crate::theme::ThemeManager;
use crate::transactions::TransactionViewer;

/// Which identity mechanism to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Registry in the key-value store
    Local,
    /// Hosted identity provider
    Identity,
    /// Identity provider when an API key is configured, local otherwise
    #[default]
    Auto,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Identity => "identity",
            BackendKind::Auto => "auto",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(BackendKind::Local),
            "identity" => Ok(BackendKind::Identity),
            "auto" => Ok(BackendKind::Auto),
            other => Err(format!("Unknown auth backend: {}", other)),
        }
    }
}

/// Pick the one backend for this run
pub fn select_backend(
    kind: BackendKind,
    identity: &IdentityConfig,
    store: SharedStore,
) -> Rc<dyn AuthBackend> {
    let use_identity = match kind {
        BackendKind::Local => false,
        BackendKind::Identity => {
            if !identity.is_configured() {
                tracing::warn!("Identity backend selected without an API key");
            }
            true
        }
        BackendKind::Auto => identity.is_configured(),
    };

    let backend: Rc<dyn AuthBackend> = if use_identity {
        Rc::new(IdentityProvider::new(identity.clone(), store))
    } else {
        Rc::new(LocalAuthStore::new(store))
    };
    tracing::info!("Using {} auth backend", backend.name());
    backend
}

/// All page components wired to one store
pub struct Marketplace {
    store: SharedStore,
    backend: Rc<dyn AuthBackend>,
    themes: Rc<ThemeManager>,
    transactions: Rc<TransactionViewer>,
    catalog: Catalog,
}

impl Marketplace {
    pub fn new(store: SharedStore, kind: BackendKind, identity: &IdentityConfig) -> Self {
        let backend = select_backend(kind, identity, Rc::clone(&store));
        Self::with_backend(store, backend)
    }

    /// Wire the components around an already constructed backend
    pub fn with_backend(store: SharedStore, backend: Rc<dyn AuthBackend>) -> Self {
        Self {
            themes: Rc::new(ThemeManager::new(Rc::clone(&store))),
            transactions: Rc::new(TransactionViewer::new(Rc::clone(&store))),
            catalog: Catalog::default(),
            backend,
            store,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn backend(&self) -> &Rc<dyn AuthBackend> {
        &self.backend
    }

    pub fn themes(&self) -> &Rc<ThemeManager> {
        &self.themes
    }

    pub fn transactions(&self) -> &Rc<TransactionViewer> {
        &self.transactions
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Attach a page and apply the current session to it
    pub fn bind(&self, view: Rc<dyn PageView>) -> AuthResult<Rc<SessionBinder>> {
        let binder = SessionBinder::new(
            Rc::clone(&self.backend),
            Rc::clone(&self.themes),
            Rc::clone(&self.transactions),
            view,
        );
        binder.bind()?;
        Ok(binder)
    }

    /// Particle renderer coloured by the active theme
    pub fn renderer(&self, config: FieldConfig, width: f64, height: f64) -> Renderer {
        Renderer::for_canvas(config, width, height, self.themes.clone())
    }
}
