//! Sign-up and Log-in Forms
//!
//! Both forms hand their fields to the session binder, which validates,
//! calls the active auth backend, shows the notice and schedules the
//! redirect.

use leptos::*;
use marketplace::{SignInForm, SignUpForm};

use crate::state::global::GlobalState;

/// Sign-up form (`signup.html`)
#[component]
pub fn SignupForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (confirm, set_confirm) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let form = SignUpForm {
            email: email.get(),
            password: password.get(),
            confirm_password: confirm.get(),
        };

        set_submitting.set(true);
        let binder = state.binder.clone();
        spawn_local(async move {
            let _ = binder.submit_sign_up(&form).await;
            set_submitting.set(false);
        });
    };

    view! {
        <form id="signupForm" on:submit=on_submit class="auth-form">
            <h2>"Create an account"</h2>
            <FormField label="Email" kind="email" value=email set_value=set_email />
            <FormField label="Password" kind="password" value=password set_value=set_password />
            <FormField label="Confirm Password" kind="password" value=confirm set_value=set_confirm />
            <button type="submit" disabled=move || submitting.get()>
                {move || if submitting.get() { "Signing up..." } else { "Sign Up" }}
            </button>
            <p>"Already have an account? " <a href="login.html">"Log in"</a></p>
        </form>
    }
}

/// Log-in form (`login.html`)
#[component]
pub fn LoginForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let form = SignInForm {
            email: email.get(),
            password: password.get(),
        };

        set_submitting.set(true);
        let binder = state.binder.clone();
        spawn_local(async move {
            let _ = binder.submit_sign_in(&form).await;
            set_submitting.set(false);
        });
    };

    view! {
        <form id="loginForm" on:submit=on_submit class="auth-form">
            <h2>"Log in"</h2>
            <FormField label="Email" kind="email" value=email set_value=set_email />
            <FormField label="Password" kind="password" value=password set_value=set_password />
            <button type="submit" disabled=move || submitting.get()>
                {move || if submitting.get() { "Logging in..." } else { "Log In" }}
            </button>
            <p>"New here? " <a href="signup.html">"Create an account"</a></p>
        </form>
    }
}

#[component]
fn FormField(
    label: &'static str,
    kind: &'static str,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
) -> impl IntoView {
    view! {
        <label class="form-field">
            <span>{label}</span>
            <input
                type=kind
                required=true
                prop:value=move || value.get()
                on:input=move |ev| set_value.set(event_target_value(&ev))
            />
        </label>
    }
}
