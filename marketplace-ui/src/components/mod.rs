//! UI Components
//!
//! Leptos components shared by the marketplace, login and sign-up pages.

pub mod auth_forms;
pub mod catalog;
pub mod nav;
pub mod particle_canvas;
pub mod settings_modal;
pub mod toast;
pub mod transactions;

pub use auth_forms::{LoginForm, SignupForm};
pub use catalog::CatalogSection;
pub use nav::Nav;
pub use particle_canvas::ParticleCanvas;
pub use settings_modal::SettingsModal;
pub use toast::Toast;
pub use transactions::TransactionsPanel;
