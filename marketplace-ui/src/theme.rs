//! Theme plumbing for the document
//!
//! The active theme is exposed as a `data-theme` attribute on the root
//! element; stylesheets scope their custom properties on it. The particle
//! canvas reads those properties back every frame.

use std::rc::Rc;

use marketplace::{Palette, PaletteSource, Rgba, Theme, ThemeManager, PALETTE_VARIABLES};

const THEME_ATTRIBUTE: &str = "data-theme";

fn root_element() -> Option<web_sys::Element> {
    web_sys::window()?.document()?.document_element()
}

/// Make `theme` the document's only theme scope
pub fn apply_document_theme(theme: Theme) {
    let Some(root) = root_element() else {
        return;
    };

    let result = match theme.style_scope() {
        Some(scope) => root.set_attribute(THEME_ATTRIBUTE, scope),
        None => root.remove_attribute(THEME_ATTRIBUTE),
    };
    if let Err(e) = result {
        web_sys::console::warn_1(&e);
    }
}

/// Palette resolved from the document's computed style
///
/// Any variable that is missing or not an `rgb()`/`rgba()`/hex color falls
/// back to the active theme's built-in palette.
pub struct CssPalette {
    themes: Rc<ThemeManager>,
}

impl CssPalette {
    pub fn new(themes: Rc<ThemeManager>) -> Self {
        Self { themes }
    }
}

impl PaletteSource for CssPalette {
    fn palette(&self) -> Palette {
        let fallback = self.themes.active().palette();

        let Some(style) = root_element()
            .and_then(|root| web_sys::window()?.get_computed_style(&root).ok()?)
        else {
            return fallback;
        };

        let read = |name: &str, default: Rgba| {
            style
                .get_property_value(name)
                .ok()
                .and_then(|value| Rgba::parse(&value))
                .unwrap_or(default)
        };

        Palette {
            disk_stops: [
                read(PALETTE_VARIABLES[0], fallback.disk_stops[0]),
                read(PALETTE_VARIABLES[1], fallback.disk_stops[1]),
                read(PALETTE_VARIABLES[2], fallback.disk_stops[2]),
            ],
            particle: read(PALETTE_VARIABLES[3], fallback.particle),
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use marketplace::MemoryStore;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    fn root_style() -> web_sys::CssStyleDeclaration {
        root_element()
            .and_then(|root| root.dyn_into::<web_sys::HtmlElement>().ok())
            .expect("document root")
            .style()
    }

    #[wasm_bindgen_test]
    fn test_palette_falls_back_per_variable() {
        let themes = Rc::new(ThemeManager::new(MemoryStore::shared()));
        themes.apply_theme(Theme::Nebula).unwrap();
        let builtin = Theme::Nebula.palette();
        let palette = CssPalette::new(Rc::clone(&themes));

        // No variables defined: the whole palette is the theme's
        assert_eq!(palette.palette(), builtin);

        let style = root_style();
        style.set_property(PALETTE_VARIABLES[3], "#102030").unwrap();
        style.set_property(PALETTE_VARIABLES[0], "not-a-color").unwrap();

        let resolved = palette.palette();
        assert_eq!(resolved.particle, Rgba::new(16, 32, 48, 1.0));
        assert_eq!(resolved.disk_stops, builtin.disk_stops);

        style.remove_property(PALETTE_VARIABLES[3]).unwrap();
        style.remove_property(PALETTE_VARIABLES[0]).unwrap();
    }

    #[wasm_bindgen_test]
    fn test_document_theme_attribute() {
        apply_document_theme(Theme::Dark);
        let root = root_element().expect("document root");
        assert_eq!(
            root.get_attribute(THEME_ATTRIBUTE).as_deref(),
            Theme::Dark.style_scope()
        );

        apply_document_theme(Theme::Default);
        assert_eq!(
            root.get_attribute(THEME_ATTRIBUTE).as_deref(),
            Theme::Default.style_scope()
        );
    }
}
