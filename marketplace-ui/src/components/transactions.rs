//! Transactions Panel
//!
//! "View Transactions" toggles the signed-in user's purchase list.

use leptos::*;

use crate::state::global::GlobalState;

#[component]
pub fn TransactionsPanel() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let open = state.transactions_open;
    let lines = state.transaction_lines;
    let signed_in = state.session_email;

    let on_toggle = move |_: ev::MouseEvent| state.toggle_transactions();

    view! {
        <Show when=move || signed_in.get().is_some()>
            <section class="transactions">
                <button id="viewTransactionsBtn" on:click=on_toggle.clone()>
                    {move || if open.get() { "Hide Transactions" } else { "View Transactions" }}
                </button>

                <Show when=move || open.get()>
                    <ul id="transactionList">
                        <For
                            each=move || lines.get().into_iter().enumerate()
                            key=|(i, line)| (*i, line.clone())
                            children=|(_, line)| view! { <li>{line}</li> }
                        />
                    </ul>
                </Show>
            </section>
        </Show>
    }
}
