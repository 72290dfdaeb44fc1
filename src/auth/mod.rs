//! Authentication
//!
//! Two interchangeable identity mechanisms behind one `AuthBackend` trait:
//!
//! - **identity**: adapter over a hosted identity provider's REST API
//! - **local**: fallback store keeping users and the session in key-value
//!   storage
//!
//! The backend is chosen once at startup; everything downstream (the session
//! binder, the CLI, the UI) only sees `dyn AuthBackend`.

mod error;
mod identity;
mod local;

pub use error::{AuthError, AuthResult, ValidationError};
pub use identity::{IdentityConfig, IdentityProvider, ProfileDocument};
pub use local::{LocalAuthStore, UserRecord};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::events::{Publisher, SubscriptionId};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// The signed-in identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    /// Provider or registry id, when the backend knows it
    pub user_id: Option<String>,
}

impl Session {
    pub fn new(email: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            email: email.into(),
            user_id,
        }
    }
}

/// Event delivered on every session transition (`None` = signed out)
pub type SessionChange = Option<Session>;

/// Check a new password against its confirmation and the length rule
///
/// The mismatch is reported first, so a short mismatched pair yields
/// `PasswordMismatch`.
pub fn validate_new_password(password: &str, confirm_password: &str) -> Result<(), ValidationError> {
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Common interface for identity mechanisms
#[async_trait(?Send)]
pub trait AuthBackend {
    /// Short backend name for logs ("local", "identity")
    fn name(&self) -> &'static str;

    /// Register a new account
    async fn sign_up(&self, email: &str, password: &str, confirm_password: &str) -> AuthResult<()>;

    /// Authenticate and make the account the current session
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<()>;

    /// Clear the current session. Signing out twice is not an error.
    async fn sign_out(&self) -> AuthResult<()>;

    /// The signed-in identity, if any
    fn current_session(&self) -> AuthResult<Option<Session>>;

    /// Publisher notified on every session transition
    fn session_events(&self) -> &Publisher<SessionChange>;
}

impl<'a> dyn AuthBackend + 'a {
    /// Register a handler invoked with the new session on every transition
    pub fn on_session_change(
        &self,
        handler: impl Fn(Option<&Session>) + 'static,
    ) -> SubscriptionId {
        self.session_events()
            .subscribe(move |change: &SessionChange| handler(change.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_checked_before_length() {
        assert_eq!(
            validate_new_password("abc", "abd"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            validate_new_password("abc", "abc"),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_eq!(validate_new_password("secret1", "secret1"), Ok(()));
    }

    #[test]
    fn test_length_counts_characters() {
        // six characters, more than six bytes
        assert!(validate_new_password("ééééé1", "ééééé1").is_ok());
    }
}
