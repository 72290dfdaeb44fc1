//! Toast Notification Component
//!
//! Shows the current notice until it times out.

use leptos::*;
use marketplace::NoticeKind;

use crate::state::global::GlobalState;

/// Notice container
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div id="message" class="fixed bottom-6 right-4 z-50 space-y-2">
            {move || {
                state.notice.get().map(|notice| view! {
                    <ToastMessage message=notice.text kind=notice.kind />
                })
            }}
        </div>
    }
}

#[component]
fn ToastMessage(
    #[prop(into)]
    message: String,
    kind: NoticeKind,
) -> impl IntoView {
    let (icon, class) = match kind {
        NoticeKind::Success => ("✓", "message success"),
        NoticeKind::Error => ("✕", "message error"),
    };

    view! {
        <div class=class>
            <span class="icon">{icon}</span>
            <span>{message}</span>
        </div>
    }
}
