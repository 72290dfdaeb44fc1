//! Global Application State
//!
//! Reactive state management using Leptos signals. The core components
//! (auth backend, theme manager, transaction viewer, catalog) live in one
//! `Marketplace`; the session binder writes into the signals below through
//! `SignalView`.

use leptos::*;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use marketplace::{
    BackendKind, Category, Control, IdentityConfig, Marketplace, Notice, Page, PageView,
    SessionBinder, SettingsModal, Theme, TransactionRecord, NOTICE_TIMEOUT,
};

use crate::storage::page_store;
use crate::theme::apply_document_theme;

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    pub app: Rc<Marketplace>,
    pub binder: Rc<SessionBinder>,
    pub settings: Rc<SettingsModal>,
    /// Navigation controls currently shown
    pub controls: RwSignal<HashSet<Control>>,
    /// Email of the signed-in user
    pub session_email: RwSignal<Option<String>>,
    /// Notice currently on screen
    pub notice: RwSignal<Option<Notice>>,
    /// Rendered transaction lines
    pub transaction_lines: RwSignal<Vec<String>>,
    pub transactions_open: RwSignal<bool>,
    /// Active theme, mirrored from the theme manager
    pub theme: RwSignal<Theme>,
    pub settings_open: RwSignal<bool>,
    /// Active catalog filter
    pub category: RwSignal<Category>,
    view: SignalView,
}

/// The binder's view of the page: plain signal writes
#[derive(Clone, Copy)]
struct SignalView {
    controls: RwSignal<HashSet<Control>>,
    session_email: RwSignal<Option<String>>,
    notice: RwSignal<Option<Notice>>,
    /// Bumped for every notice shown; a clear timer only fires for its own
    notice_generation: StoredValue<u64>,
    transaction_lines: RwSignal<Vec<String>>,
}

impl SignalView {
    fn new() -> Self {
        Self {
            controls: create_rw_signal(HashSet::new()),
            session_email: create_rw_signal(None),
            notice: create_rw_signal(None),
            notice_generation: store_value(0),
            transaction_lines: create_rw_signal(Vec::new()),
        }
    }

    /// Put a notice on screen, returning its generation
    fn post_notice(&self, notice: Notice) -> u64 {
        let generation = self.notice_generation.get_value() + 1;
        self.notice_generation.set_value(generation);
        self.notice.set(Some(notice));
        generation
    }

    /// Clear the notice if nothing newer replaced it
    fn expire_notice(&self, generation: u64) {
        if self.notice_generation.get_value() == generation {
            self.notice.set(None);
        }
    }
}

impl PageView for SignalView {
    fn set_control_visible(&self, control: Control, visible: bool) {
        self.controls.update(|shown| {
            if visible {
                shown.insert(control);
            } else {
                shown.remove(&control);
            }
        });
    }

    fn set_welcome(&self, email: Option<&str>) {
        self.session_email.set(email.map(str::to_string));
    }

    fn show_notice(&self, notice: Notice) {
        let generation = self.post_notice(notice);

        let view = *self;
        gloo_timers::callback::Timeout::new(millis(NOTICE_TIMEOUT), move || {
            view.expire_notice(generation);
        })
        .forget();
    }

    fn redirect_after(&self, page: Page, delay: Duration) {
        gloo_timers::callback::Timeout::new(millis(delay), move || {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(page.href());
            }
        })
        .forget();
    }

    fn set_transactions(&self, records: Vec<TransactionRecord>) {
        self.transaction_lines
            .set(records.iter().map(TransactionRecord::display_line).collect());
    }
}

fn millis(duration: Duration) -> u32 {
    duration.as_millis().min(u32::MAX as u128) as u32
}

/// Identity provider settings baked in at build time
fn identity_config() -> IdentityConfig {
    let mut config = IdentityConfig::default();
    if let Some(api_key) = option_env!("MARKETPLACE_API_KEY") {
        config.api_key = api_key.to_string();
    }
    if let Some(project_id) = option_env!("MARKETPLACE_PROJECT_ID") {
        config.project_id = project_id.to_string();
    }
    if let Some(app_id) = option_env!("MARKETPLACE_APP_ID") {
        config.app_id = app_id.to_string();
    }
    config
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let app = Rc::new(Marketplace::new(
        page_store(),
        BackendKind::Auto,
        &identity_config(),
    ));

    let theme = create_rw_signal(app.themes().active());
    app.themes().subscribe(move |change| {
        theme.set(change.theme);
        apply_document_theme(change.theme);
    });

    let view = SignalView::new();

    let binder = SessionBinder::new(
        Rc::clone(app.backend()),
        Rc::clone(app.themes()),
        Rc::clone(app.transactions()),
        Rc::new(view),
    );
    // The binder stays subscribed even when the stored session is unreadable
    if let Err(e) = binder.bind() {
        web_sys::console::error_1(&format!("Could not read session: {}", e).into());
    }

    let state = GlobalState {
        category: create_rw_signal(app.catalog().active()),
        binder,
        settings: Rc::new(SettingsModal::new()),
        controls: view.controls,
        session_email: view.session_email,
        notice: view.notice,
        transaction_lines: view.transaction_lines,
        transactions_open: create_rw_signal(false),
        theme,
        settings_open: create_rw_signal(false),
        view,
        app,
    };

    provide_context(state);
}

impl GlobalState {
    pub fn is_shown(&self, control: Control) -> bool {
        self.controls.get().contains(&control)
    }

    /// Apply and persist a theme picked in the settings modal
    pub fn select_theme(&self, theme: Theme) {
        if let Err(e) = self.app.themes().apply_theme(theme) {
            self.show_error(&format!("Could not save theme: {}", e));
        }
    }

    pub fn open_settings(&self) {
        self.settings.open();
        self.settings_open.set(self.settings.is_open());
    }

    pub fn close_settings(&self) {
        self.settings.close();
        self.settings_open.set(self.settings.is_open());
    }

    pub fn settings_backdrop_clicked(&self) {
        self.settings.backdrop_clicked();
        self.settings_open.set(self.settings.is_open());
    }

    /// Flip the transaction panel, re-rendering the list
    pub fn toggle_transactions(&self) {
        let email = self.session_email.get_untracked();
        match self.app.transactions().toggle_display(email.as_deref()) {
            Ok(panel) => {
                self.transaction_lines.set(panel.lines);
                self.transactions_open.set(panel.visible);
            }
            Err(e) => self.show_error(&format!("Could not load transactions: {}", e)),
        }
    }

    pub fn select_category(&self, category: Category) {
        self.app.catalog().select(category);
        self.category.set(self.app.catalog().active());
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.view.show_notice(Notice::error(message));
    }
}
