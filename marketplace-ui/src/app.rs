//! App Root Component
//!
//! One WASM bundle serves every page; the page is picked from the URL the
//! same way the redirects name them.

use leptos::*;

use crate::components::{
    CatalogSection, LoginForm, Nav, ParticleCanvas, SettingsModal, SignupForm, Toast,
    TransactionsPanel,
};
use crate::state::global::provide_global_state;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageKind {
    Marketplace,
    Login,
    Signup,
}

impl PageKind {
    fn from_path(path: &str) -> Self {
        match path.rsplit('/').next().unwrap_or_default() {
            "login.html" => PageKind::Login,
            "signup.html" => PageKind::Signup,
            _ => PageKind::Marketplace,
        }
    }

    fn current() -> Self {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .map(|path| Self::from_path(&path))
            .unwrap_or(PageKind::Marketplace)
    }
}

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state to all components
    provide_global_state();

    let content = match PageKind::current() {
        PageKind::Login => view! { <LoginForm /> }.into_view(),
        PageKind::Signup => view! { <SignupForm /> }.into_view(),
        PageKind::Marketplace => view! {
            <header class="hero">
                <h1>"Plugins from beyond the event horizon"</h1>
            </header>
            <TransactionsPanel />
            <CatalogSection />
        }
        .into_view(),
    };

    view! {
        <ParticleCanvas />
        <Nav />
        <main class="content">{content}</main>
        <SettingsModal />
        <Toast />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_from_path() {
        assert_eq!(PageKind::from_path("/shop/login.html"), PageKind::Login);
        assert_eq!(PageKind::from_path("/signup.html"), PageKind::Signup);
        assert_eq!(PageKind::from_path("/"), PageKind::Marketplace);
        assert_eq!(PageKind::from_path("/index.html"), PageKind::Marketplace);
    }
}
