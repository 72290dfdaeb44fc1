//! Session/UI Binder
//!
//! Connects whichever `AuthBackend` is active to the page: toggles the
//! navigation controls on every session change, loads the signed-in user's
//! theme and transactions, and runs the sign-up / sign-in / sign-out form
//! handlers with their notices and delayed redirects.
//!
//! The page itself sits behind the `PageView` port so the same logic drives
//! the Leptos UI, the CLI and the tests.

use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::auth::{AuthBackend, AuthError, AuthResult, Session, ValidationError};
use crate::events::SubscriptionId;
use crate::theme::ThemeManager;
use crate::transactions::{TransactionRecord, TransactionViewer};

/// How long a notice stays on screen
pub const NOTICE_TIMEOUT: Duration = Duration::from_secs(5);

/// Delay between a successful auth action and the page change
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Navigation controls whose visibility follows the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    LogIn,
    SignUp,
    LogOut,
    Settings,
}

impl Control {
    pub const ALL: [Control; 4] = [Control::LogIn, Control::SignUp, Control::LogOut, Control::Settings];

    /// Whether the control is shown for the given session state
    pub fn visible_when(&self, signed_in: bool) -> bool {
        match self {
            Control::LogIn | Control::SignUp => !signed_in,
            Control::LogOut | Control::Settings => signed_in,
        }
    }
}

/// Redirect targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Marketplace,
}

impl Page {
    pub fn href(&self) -> &'static str {
        match self {
            Page::Login => "login.html",
            Page::Marketplace => "index.html",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient on-page message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Error,
        }
    }
}

/// The page as seen by the binder
///
/// Implementations tolerate missing elements: a page without a given
/// control simply ignores updates to it.
pub trait PageView {
    fn set_control_visible(&self, control: Control, visible: bool);

    /// Show `Welcome, {email}` or hide the label
    fn set_welcome(&self, email: Option<&str>);

    /// Show a notice; the view clears it after `NOTICE_TIMEOUT`
    fn show_notice(&self, notice: Notice);

    /// Navigate to `page` once `delay` has elapsed
    fn redirect_after(&self, page: Page, delay: Duration);

    /// Replace the signed-in user's transaction list
    fn set_transactions(&self, records: Vec<TransactionRecord>);
}

/// Sign-up form fields
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Sign-in form fields
#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

/// Wires session state to the page
pub struct SessionBinder {
    backend: Rc<dyn AuthBackend>,
    themes: Rc<ThemeManager>,
    transactions: Rc<TransactionViewer>,
    view: Rc<dyn PageView>,
}

impl SessionBinder {
    pub fn new(
        backend: Rc<dyn AuthBackend>,
        themes: Rc<ThemeManager>,
        transactions: Rc<TransactionViewer>,
        view: Rc<dyn PageView>,
    ) -> Rc<Self> {
        Rc::new(Self {
            backend,
            themes,
            transactions,
            view,
        })
    }

    pub fn backend(&self) -> &Rc<dyn AuthBackend> {
        &self.backend
    }

    /// Follow session changes from now on and apply the current state
    pub fn bind(self: &Rc<Self>) -> AuthResult<SubscriptionId> {
        let weak: Weak<Self> = Rc::downgrade(self);
        let id = self.backend.on_session_change(move |session| {
            if let Some(binder) = weak.upgrade() {
                binder.apply_session(session);
            }
        });

        let current = self.backend.current_session()?;
        self.apply_session(current.as_ref());
        Ok(id)
    }

    /// Bring the page in line with a session state
    pub fn apply_session(&self, session: Option<&Session>) {
        let signed_in = session.is_some();
        for control in Control::ALL {
            self.view
                .set_control_visible(control, control.visible_when(signed_in));
        }
        self.view.set_welcome(session.map(|s| s.email.as_str()));

        match session {
            Some(session) => {
                tracing::info!("Session active for {}", session.email);

                if let Err(e) = self.themes.apply_saved_theme() {
                    tracing::warn!("Could not restore saved theme: {}", e);
                }

                match self.transactions.load_transactions(Some(&session.email)) {
                    Ok(records) => self.view.set_transactions(records),
                    Err(e) => tracing::warn!("Could not load transactions: {}", e),
                }
            }
            None => {
                tracing::info!("No active session");
                self.themes.reset_to_base();
                self.view.set_transactions(Vec::new());
            }
        }
    }

    /// Sign-up form submitted
    pub async fn submit_sign_up(&self, form: &SignUpForm) -> AuthResult<()> {
        let result = self.try_sign_up(form).await;
        self.report(
            result,
            "Signup",
            "Signup successful! Redirecting to login...",
            Page::Login,
        )
    }

    async fn try_sign_up(&self, form: &SignUpForm) -> AuthResult<()> {
        require("email", &form.email)?;
        require("password", &form.password)?;
        require("confirm password", &form.confirm_password)?;

        self.backend
            .sign_up(&form.email, &form.password, &form.confirm_password)
            .await
    }

    /// Sign-in form submitted
    pub async fn submit_sign_in(&self, form: &SignInForm) -> AuthResult<()> {
        let result = self.try_sign_in(form).await;
        self.report(
            result,
            "Login",
            "Login successful! Redirecting to marketplace...",
            Page::Marketplace,
        )
    }

    async fn try_sign_in(&self, form: &SignInForm) -> AuthResult<()> {
        require("email", &form.email)?;
        require("password", &form.password)?;

        self.backend.sign_in(&form.email, &form.password).await
    }

    /// Log-out control clicked
    pub async fn sign_out(&self) -> AuthResult<()> {
        let result = self.backend.sign_out().await;
        self.report(
            result,
            "Logout",
            "Logged out successfully.",
            Page::Marketplace,
        )
    }

    /// Show the outcome of a form action and redirect on success
    fn report(
        &self,
        result: AuthResult<()>,
        action: &str,
        success: &str,
        target: Page,
    ) -> AuthResult<()> {
        match &result {
            Ok(()) => {
                self.view.show_notice(Notice::success(success));
                self.view.redirect_after(target, REDIRECT_DELAY);
            }
            // Form-level validation reads as a plain instruction
            Err(AuthError::Validation(e)) => {
                self.view.show_notice(Notice::error(e.to_string()));
            }
            Err(e) => {
                tracing::warn!("{} failed: {}", action, e);
                self.view
                    .show_notice(Notice::error(format!("{} failed: {}", action, e)));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::LocalAuthStore;
    use crate::storage::MemoryStore;
    use crate::theme::Theme;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingView {
        controls: RefCell<HashMap<Control, bool>>,
        welcome: RefCell<Option<String>>,
        notices: RefCell<Vec<Notice>>,
        redirects: RefCell<Vec<(Page, Duration)>>,
        transactions: RefCell<Vec<TransactionRecord>>,
    }

    impl PageView for RecordingView {
        fn set_control_visible(&self, control: Control, visible: bool) {
            self.controls.borrow_mut().insert(control, visible);
        }

        fn set_welcome(&self, email: Option<&str>) {
            *self.welcome.borrow_mut() = email.map(|e| format!("Welcome, {}", e));
        }

        fn show_notice(&self, notice: Notice) {
            self.notices.borrow_mut().push(notice);
        }

        fn redirect_after(&self, page: Page, delay: Duration) {
            self.redirects.borrow_mut().push((page, delay));
        }

        fn set_transactions(&self, records: Vec<TransactionRecord>) {
            *self.transactions.borrow_mut() = records;
        }
    }

    struct Fixture {
        binder: Rc<SessionBinder>,
        view: Rc<RecordingView>,
        themes: Rc<ThemeManager>,
    }

    fn create_fixture() -> Fixture {
        let store = MemoryStore::shared();
        let backend = Rc::new(LocalAuthStore::new(store.clone()));
        let themes = Rc::new(ThemeManager::new(store.clone()));
        let transactions = Rc::new(TransactionViewer::new(store));
        let view = Rc::new(RecordingView::default());

        let binder = SessionBinder::new(backend, Rc::clone(&themes), transactions, view.clone());
        binder.bind().unwrap();

        Fixture {
            binder,
            view,
            themes,
        }
    }

    fn visible(view: &RecordingView, control: Control) -> bool {
        view.controls.borrow()[&control]
    }

    #[tokio::test]
    async fn test_signed_out_page() {
        let fx = create_fixture();

        assert!(visible(&fx.view, Control::LogIn));
        assert!(visible(&fx.view, Control::SignUp));
        assert!(!visible(&fx.view, Control::LogOut));
        assert!(!visible(&fx.view, Control::Settings));
        assert!(fx.view.welcome.borrow().is_none());
    }

    #[tokio::test]
    async fn test_full_flow() {
        let fx = create_fixture();

        fx.binder
            .submit_sign_up(&SignUpForm {
                email: "ana@example.com".into(),
                password: "secret1".into(),
                confirm_password: "secret1".into(),
            })
            .await
            .unwrap();
        assert_eq!(
            fx.view.notices.borrow().last().unwrap().text,
            "Signup successful! Redirecting to login..."
        );
        assert_eq!(fx.view.redirects.borrow()[0], (Page::Login, REDIRECT_DELAY));

        fx.themes.apply_theme(Theme::Nebula).unwrap();

        fx.binder
            .submit_sign_in(&SignInForm {
                email: "ana@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();

        assert!(!visible(&fx.view, Control::LogIn));
        assert!(visible(&fx.view, Control::Settings));
        assert_eq!(
            fx.view.welcome.borrow().as_deref(),
            Some("Welcome, ana@example.com")
        );
        assert_eq!(fx.view.transactions.borrow().len(), 3);
        assert_eq!(fx.themes.active(), Theme::Nebula);
        assert_eq!(
            fx.view.redirects.borrow()[1],
            (Page::Marketplace, REDIRECT_DELAY)
        );

        fx.binder.sign_out().await.unwrap();

        assert!(visible(&fx.view, Control::LogIn));
        assert!(!visible(&fx.view, Control::LogOut));
        assert!(fx.view.transactions.borrow().is_empty());
        assert_eq!(fx.themes.active(), Theme::Default);
        assert_eq!(fx.themes.saved_theme().unwrap(), Theme::Nebula);
        assert_eq!(
            fx.view.notices.borrow().last().unwrap().text,
            "Logged out successfully."
        );
    }

    #[tokio::test]
    async fn test_email_passed_through_verbatim() {
        let fx = create_fixture();

        fx.binder
            .submit_sign_up(&SignUpForm {
                email: "ana@x.io ".into(),
                password: "secret1".into(),
                confirm_password: "secret1".into(),
            })
            .await
            .unwrap();

        // Registry emails match exactly; surrounding spaces are part of the key
        let err = fx
            .binder
            .submit_sign_in(&SignInForm {
                email: "ana@x.io".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        fx.binder
            .submit_sign_in(&SignInForm {
                email: "ana@x.io ".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        assert_eq!(
            fx.view.welcome.borrow().as_deref(),
            Some("Welcome, ana@x.io ")
        );
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let fx = create_fixture();

        let err = fx
            .binder
            .submit_sign_in(&SignInForm {
                email: "  ".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::MissingField("email"))
        ));
        let notice = fx.view.notices.borrow().last().cloned().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(fx.view.redirects.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_failed_login_notice() {
        let fx = create_fixture();

        fx.binder
            .submit_sign_in(&SignInForm {
                email: "nobody@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(
            fx.view.notices.borrow().last().unwrap().text,
            "Login failed: Invalid email or password."
        );
        assert!(fx.view.redirects.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_password_mismatch_notice() {
        let fx = create_fixture();

        fx.binder
            .submit_sign_up(&SignUpForm {
                email: "ana@example.com".into(),
                password: "abc".into(),
                confirm_password: "abcd".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(
            fx.view.notices.borrow().last().unwrap().text,
            "Passwords do not match!"
        );
    }

    #[tokio::test]
    async fn test_dropped_binder_stops_listening() {
        let fx = create_fixture();
        let backend = Rc::clone(fx.binder.backend());
        let view = Rc::clone(&fx.view);
        drop(fx);

        backend
            .sign_up("ana@example.com", "secret1", "secret1")
            .await
            .unwrap();
        backend.sign_in("ana@example.com", "secret1").await.unwrap();
        assert!(visible(&view, Control::LogIn));
        assert!(view.welcome.borrow().is_none());
    }
}
