//! Settings Modal
//!
//! Theme picker shown over the page. Clicking the backdrop (but not the
//! dialog itself) closes it.

use leptos::*;
use marketplace::Theme;

use crate::state::global::GlobalState;

#[component]
pub fn SettingsModal() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let open = state.settings_open;
    let theme = state.theme;

    let state_for_backdrop = state.clone();
    let on_backdrop = move |_: ev::MouseEvent| state_for_backdrop.settings_backdrop_clicked();

    let state_for_close = state.clone();
    let on_close = move |_: ev::MouseEvent| state_for_close.close_settings();

    let on_change = move |ev: ev::Event| match event_target_value(&ev).parse::<Theme>() {
        Ok(selected) => state.select_theme(selected),
        Err(e) => state.show_error(&e.to_string()),
    };

    view! {
        <Show when=move || open.get()>
            <div id="settingsModal" class="modal" on:click=on_backdrop.clone()>
                <div class="modal-content" on:click=|ev: ev::MouseEvent| ev.stop_propagation()>
                    <button class="close" on:click=on_close.clone()>"×"</button>
                    <h2>"Settings"</h2>

                    <label for="themeSelect">"Theme"</label>
                    <select id="themeSelect" on:change=on_change.clone()>
                        {Theme::ALL
                            .into_iter()
                            .map(|option| view! {
                                <option
                                    value=option.as_str()
                                    selected=move || theme.get() == option
                                >
                                    {option.label()}
                                </option>
                            })
                            .collect_view()}
                    </select>
                </div>
            </div>
        </Show>
    }
}
