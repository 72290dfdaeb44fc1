//! Marketplace Front End
//!
//! Client-side rendered Leptos application compiled to WebAssembly. The
//! same bundle drives the marketplace, log-in and sign-up pages; account,
//! theme and purchase state live in the browser's localStorage (or with
//! the hosted identity provider when one is configured at build time).

use leptos::*;

mod app;
mod components;
mod state;
mod storage;
mod theme;

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
