//! Local fallback auth store
//!
//! Keeps a registry of users and a single session pointer in key-value
//! storage. Used when no hosted identity provider is configured.
//!
//! Passwords are stored in plaintext and ids are short random strings; this
//! backend exists for demos, not for protecting anything.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    validate_new_password, AuthBackend, AuthError, AuthResult, Session, SessionChange,
    ValidationError,
};
use crate::events::Publisher;
use crate::storage::{keys, read_json, write_json, SharedStore};

/// Length of generated user ids
const USER_ID_LEN: usize = 9;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password: String,
}

/// Storage-backed identity mechanism
pub struct LocalAuthStore {
    store: SharedStore,
    events: Publisher<SessionChange>,
}

impl LocalAuthStore {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            events: Publisher::new(),
        }
    }

    /// All registered users, in registration order
    pub fn users(&self) -> AuthResult<Vec<UserRecord>> {
        Ok(read_json(self.store.as_ref(), keys::USERS)?.unwrap_or_default())
    }

    /// Look up a user by exact email
    pub fn find_user(&self, email: &str) -> AuthResult<Option<UserRecord>> {
        Ok(self.users()?.into_iter().find(|u| u.email == email))
    }
}

#[async_trait(?Send)]
impl AuthBackend for LocalAuthStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn sign_up(&self, email: &str, password: &str, confirm_password: &str) -> AuthResult<()> {
        validate_new_password(password, confirm_password)?;

        let mut users = self.users()?;
        if users.iter().any(|u| u.email == email) {
            return Err(ValidationError::EmailTaken(email.to_string()).into());
        }

        let user = UserRecord {
            id: generate_user_id(),
            email: email.to_string(),
            password: password.to_string(),
        };
        tracing::info!("Registered local user {} ({})", user.email, user.id);

        users.push(user);
        write_json(self.store.as_ref(), keys::USERS, &users)?;
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<()> {
        let user = self
            .users()?
            .into_iter()
            .find(|u| u.email == email && u.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        self.store.set_item(keys::LOGGED_IN_USER, &user.email)?;
        tracing::info!("Local session started for {}", user.email);

        self.events
            .publish(&Some(Session::new(user.email, Some(user.id))));
        Ok(())
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.store.remove_item(keys::LOGGED_IN_USER)?;
        tracing::info!("Local session cleared");

        self.events.publish(&None);
        Ok(())
    }

    fn current_session(&self) -> AuthResult<Option<Session>> {
        let Some(email) = self.store.get_item(keys::LOGGED_IN_USER)? else {
            return Ok(None);
        };

        // A pointer to a missing record only happens through manual storage
        // edits; report the pointer as-is.
        let user_id = self.find_user(&email)?.map(|u| u.id);
        Ok(Some(Session::new(email, user_id)))
    }

    fn session_events(&self) -> &Publisher<SessionChange> {
        &self.events
    }
}

/// Short random id, unique only in the practical sense
fn generate_user_id() -> String {
    let mut rng = rand::thread_rng();
    (0..USER_ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}
