//! Authentication error types

use thiserror::Error;

use crate::storage::StorageError;

/// Input rejected before any credential lookup happens
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Passwords do not match!")]
    PasswordMismatch,

    #[error("Password should be at least {min} characters.")]
    PasswordTooShort { min: usize },

    #[error("An account with email {0} already exists.")]
    EmailTaken(String),

    #[error("Please fill in the {0} field.")]
    MissingField(&'static str),
}

/// Errors returned by any `AuthBackend`
#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// Failure reported by the hosted identity provider, message verbatim
    #[error("{0}")]
    Provider(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Result type alias for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::PasswordMismatch.to_string(),
            "Passwords do not match!"
        );
        assert_eq!(
            ValidationError::PasswordTooShort { min: 6 }.to_string(),
            "Password should be at least 6 characters."
        );
    }

    #[test]
    fn test_provider_message_is_verbatim() {
        let err = AuthError::Provider("EMAIL_EXISTS".to_string());
        assert_eq!(err.to_string(), "EMAIL_EXISTS");
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: AuthError = ValidationError::MissingField("email").into();
        assert_eq!(err.to_string(), "Please fill in the email field.");
    }
}
