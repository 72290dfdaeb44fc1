//! Theme Manager
//!
//! Persists and applies a named visual theme. The active theme is the single
//! global style scope; every change is published to subscribers (the page
//! host that swaps style variables, the renderer host, the binder).

mod palette;

pub use palette::{Palette, PaletteSource, Rgba, PALETTE_VARIABLES};

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::events::{Publisher, SubscriptionId};
use crate::storage::{keys, SharedStore, StorageResult};

/// Closed set of visual themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Base styling, no theme scope applied
    #[default]
    Default,
    Dark,
    Light,
    Nebula,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Default, Theme::Dark, Theme::Light, Theme::Nebula];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Nebula => "nebula",
        }
    }

    /// Human-readable label for selector controls
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Default => "Default",
            Theme::Dark => "Dark",
            Theme::Light => "Light",
            Theme::Nebula => "Nebula",
        }
    }

    /// Value of the global style scope, `None` for base styling
    pub fn style_scope(&self) -> Option<&'static str> {
        match self {
            Theme::Default => None,
            other => Some(other.as_str()),
        }
    }

    /// Built-in values of the theme's style variables
    pub fn palette(&self) -> Palette {
        match self {
            Theme::Default => Palette {
                disk_stops: [
                    Rgba::new(106, 5, 149, 1.0),
                    Rgba::new(157, 51, 209, 0.8),
                    Rgba::new(106, 5, 149, 0.0),
                ],
                particle: Rgba::new(255, 255, 255, 1.0),
            },
            Theme::Dark => Palette {
                disk_stops: [
                    Rgba::new(20, 20, 40, 1.0),
                    Rgba::new(70, 70, 120, 0.8),
                    Rgba::new(20, 20, 40, 0.0),
                ],
                particle: Rgba::new(200, 210, 255, 1.0),
            },
            Theme::Light => Palette {
                disk_stops: [
                    Rgba::new(255, 170, 60, 1.0),
                    Rgba::new(255, 210, 120, 0.8),
                    Rgba::new(255, 170, 60, 0.0),
                ],
                particle: Rgba::new(60, 60, 80, 1.0),
            },
            Theme::Nebula => Palette {
                disk_stops: [
                    Rgba::new(0, 140, 160, 1.0),
                    Rgba::new(220, 60, 170, 0.8),
                    Rgba::new(0, 140, 160, 0.0),
                ],
                particle: Rgba::new(190, 255, 240, 1.0),
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),
}

impl FromStr for Theme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| ThemeError::UnknownTheme(s.to_string()))
    }
}

/// Payload of a theme change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeChanged {
    pub theme: Theme,
}

/// Applies, persists and broadcasts the visual theme
pub struct ThemeManager {
    store: SharedStore,
    /// Global style scope currently applied
    active: Cell<Theme>,
    /// Value shown by the settings selector
    selected: Cell<Theme>,
    events: Publisher<ThemeChanged>,
}

impl ThemeManager {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            active: Cell::new(Theme::Default),
            selected: Cell::new(Theme::Default),
            events: Publisher::new(),
        }
    }

    /// Theme currently applied to the style scope
    pub fn active(&self) -> Theme {
        self.active.get()
    }

    /// Theme reflected in the settings selector
    pub fn selected(&self) -> Theme {
        self.selected.get()
    }

    /// Apply, persist and broadcast a theme
    pub fn apply_theme(&self, theme: Theme) -> StorageResult<()> {
        self.active.set(theme);
        self.store.set_item(keys::SELECTED_THEME, theme.as_str())?;
        tracing::info!("Applied theme {}", theme);

        self.events.publish(&ThemeChanged { theme });
        Ok(())
    }

    /// Persisted theme, falling back to the base theme
    pub fn saved_theme(&self) -> StorageResult<Theme> {
        let Some(name) = self.store.get_item(keys::SELECTED_THEME)? else {
            return Ok(Theme::default());
        };

        Ok(name.parse().unwrap_or_else(|e: ThemeError| {
            tracing::warn!("{}, using {}", e, Theme::default());
            Theme::default()
        }))
    }

    /// Re-apply the persisted theme and reflect it in the selector
    pub fn apply_saved_theme(&self) -> StorageResult<Theme> {
        let theme = self.saved_theme()?;
        self.selected.set(theme);
        self.apply_theme(theme)?;
        Ok(theme)
    }

    /// Return the style scope to base styling without touching the saved
    /// selection, and tell subscribers so they repaint
    pub fn reset_to_base(&self) {
        let base = Theme::default();
        self.active.set(base);
        tracing::debug!("Theme scope reset to {}", base);

        self.events.publish(&ThemeChanged { theme: base });
    }

    pub fn subscribe(&self, handler: impl Fn(&ThemeChanged) + 'static) -> SubscriptionId {
        self.events.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }
}

impl PaletteSource for ThemeManager {
    fn palette(&self) -> Palette {
        self.active().palette()
    }
}

/// Settings modal visibility
#[derive(Debug, Default)]
pub struct SettingsModal {
    open: Cell<bool>,
}

impl SettingsModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn open(&self) {
        self.open.set(true);
    }

    pub fn close(&self) {
        self.open.set(false);
    }

    /// A click on the backdrop (outside the dialog) dismisses the modal
    pub fn backdrop_clicked(&self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_theme_names_round_trip() {
        for theme in Theme::ALL {
            assert_eq!(theme.as_str().parse::<Theme>(), Ok(theme));
        }
        assert_eq!(
            "sepia".parse::<Theme>(),
            Err(ThemeError::UnknownTheme("sepia".to_string()))
        );
    }

    #[test]
    fn test_default_has_no_scope() {
        assert_eq!(Theme::Default.style_scope(), None);
        assert_eq!(Theme::Nebula.style_scope(), Some("nebula"));
    }

    #[test]
    fn test_round_trip_across_reload() {
        let memory = MemoryStore::shared();

        let first = ThemeManager::new(memory.clone());
        first.apply_theme(Theme::Dark).unwrap();
        drop(first);

        let reloaded = ThemeManager::new(memory.clone());
        assert_eq!(reloaded.active(), Theme::Default);
        assert_eq!(reloaded.apply_saved_theme().unwrap(), Theme::Dark);
        assert_eq!(reloaded.active(), Theme::Dark);
        assert_eq!(reloaded.selected(), Theme::Dark);
    }

    #[test]
    fn test_saved_theme_defaults() {
        let memory = MemoryStore::shared();
        let themes = ThemeManager::new(memory.clone());
        assert_eq!(themes.saved_theme().unwrap(), Theme::Default);

        memory.set_item(keys::SELECTED_THEME, "retro").unwrap();
        assert_eq!(themes.saved_theme().unwrap(), Theme::Default);
    }

    #[test]
    fn test_apply_publishes() {
        let themes = ThemeManager::new(MemoryStore::shared());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let id = themes.subscribe(move |e| sink.borrow_mut().push(e.theme));

        themes.apply_theme(Theme::Light).unwrap();
        themes.apply_theme(Theme::Default).unwrap();
        assert!(themes.unsubscribe(id));
        themes.apply_theme(Theme::Nebula).unwrap();

        assert_eq!(*seen.borrow(), vec![Theme::Light, Theme::Default]);
    }

    #[test]
    fn test_reset_to_base_keeps_saved_selection() {
        let memory = MemoryStore::shared();
        let themes = ThemeManager::new(memory.clone());
        themes.apply_theme(Theme::Nebula).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        themes.subscribe(move |e| sink.borrow_mut().push(e.theme));

        themes.reset_to_base();

        assert_eq!(themes.active(), Theme::Default);
        assert_eq!(themes.palette(), Theme::Default.palette());
        assert_eq!(*seen.borrow(), vec![Theme::Default]);
        assert_eq!(
            memory.get_item(keys::SELECTED_THEME).unwrap().as_deref(),
            Some("nebula")
        );
    }

    #[test]
    fn test_settings_modal() {
        let modal = SettingsModal::new();
        assert!(!modal.is_open());
        modal.open();
        assert!(modal.is_open());
        modal.backdrop_clicked();
        assert!(!modal.is_open());
    }
}
