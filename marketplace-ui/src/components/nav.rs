//! Navigation Component
//!
//! Header with the session-dependent controls: log-in and sign-up links for
//! visitors, welcome label, settings and log-out for signed-in users.

use leptos::*;
use marketplace::Control;

use crate::state::global::GlobalState;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let state_for_logout = state.clone();
    let on_logout = move |_: ev::MouseEvent| {
        let binder = state_for_logout.binder.clone();
        spawn_local(async move {
            // Failures are reported through the notice
            let _ = binder.sign_out().await;
        });
    };

    let state_for_settings = state.clone();
    let on_settings = move |_: ev::MouseEvent| state_for_settings.open_settings();

    let session_email = state.session_email;

    let shown = move |control: Control| {
        let state = state.clone();
        move || state.is_shown(control)
    };

    view! {
        <nav class="navbar">
            <a href="index.html" class="brand">"Event Horizon Audio"</a>

            <div class="nav-controls">
                <Show when=move || session_email.get().is_some()>
                    <span id="userEmailDisplay">
                        {move || session_email.get().map(|email| format!("Welcome, {}", email))}
                    </span>
                </Show>

                <Show when=shown(Control::LogIn)>
                    <a id="loginBtn" href="login.html" class="nav-btn">"Log In"</a>
                </Show>
                <Show when=shown(Control::SignUp)>
                    <a id="signupBtn" href="signup.html" class="nav-btn">"Sign Up"</a>
                </Show>
                <Show when=shown(Control::Settings)>
                    <button id="settingsBtn" class="nav-btn" on:click=on_settings.clone()>
                        "Settings"
                    </button>
                </Show>
                <Show when=shown(Control::LogOut)>
                    <button id="logoutBtn" class="nav-btn" on:click=on_logout.clone()>
                        "Log Out"
                    </button>
                </Show>
            </div>
        </nav>
    }
}
