//! Hosted identity provider adapter
//!
//! REST client for an email/password identity service with a companion
//! document database. The provider owns credentials; this adapter keeps the
//! signed-in identity in the key-value store (so it survives page loads until
//! sign-out), translates failures into `AuthError::Provider` and writes a
//! profile document for every new account.
//!
//! No retries and no request timeouts: a failed call is reported once.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use super::{
    validate_new_password, AuthBackend, AuthError, AuthResult, Session, SessionChange,
};
use crate::events::Publisher;
use crate::storage::{keys, read_json, write_json, SharedStore};

/// Connection settings for the hosted identity provider
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Public API key; an empty key means "not configured"
    #[serde(default)]
    pub api_key: String,

    /// Project hosting the document database
    #[serde(default)]
    pub project_id: String,

    /// Process-wide application id scoping profile documents
    #[serde(default = "default_app_id")]
    pub app_id: String,

    #[serde(default = "default_auth_base_url")]
    pub auth_base_url: String,

    #[serde(default = "default_document_base_url")]
    pub document_base_url: String,
}

fn default_app_id() -> String {
    "default-app-id".to_string()
}

fn default_auth_base_url() -> String {
    "https://identitytoolkit.googleapis.com".to_string()
}

fn default_document_base_url() -> String {
    "https://firestore.googleapis.com".to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            project_id: String::new(),
            app_id: default_app_id(),
            auth_base_url: default_auth_base_url(),
            document_base_url: default_document_base_url(),
        }
    }
}

impl IdentityConfig {
    /// Whether enough is configured to talk to the provider
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Profile written once per account at sign-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDocument {
    pub email: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

impl ProfileDocument {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            created_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        }
    }

    /// Document database wire shape: typed field values
    fn to_fields(&self) -> serde_json::Value {
        serde_json::json!({
            "fields": {
                "email": { "stringValue": self.email },
                "createdAt": { "stringValue": self.created_at },
            }
        })
    }
}

/// Identity stored after a successful sign-up or sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignedInUser {
    uid: String,
    email: String,
    id_token: String,
}

impl SignedInUser {
    fn session(&self) -> Session {
        Session::new(self.email.clone(), Some(self.uid.clone()))
    }
}

/// Adapter over the hosted identity provider
pub struct IdentityProvider {
    client: Client,
    config: IdentityConfig,
    store: SharedStore,
    events: Publisher<SessionChange>,
}

impl IdentityProvider {
    pub fn new(config: IdentityConfig, store: SharedStore) -> Self {
        Self {
            client: Client::new(),
            config,
            store,
            events: Publisher::new(),
        }
    }

    /// Get the current configuration
    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    fn accounts_url(&self, action: &str) -> String {
        format!(
            "{}/v1/accounts:{}?key={}",
            self.config.auth_base_url.trim_end_matches('/'),
            action,
            urlencoding::encode(&self.config.api_key)
        )
    }

    /// Path of a user's profile document, relative to the database root
    pub fn profile_path(&self, uid: &str) -> String {
        let app_id = urlencoding::encode(&self.config.app_id);
        let uid = urlencoding::encode(uid);
        format!("artifacts/{app_id}/users/{uid}/profile/{uid}")
    }

    fn document_url(&self, path: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}",
            self.config.document_base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.project_id),
            path
        )
    }

    async fn password_request(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> AuthResult<SignedInUser> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };

        let response = self
            .client
            .post(self.accounts_url(action))
            .json(&body)
            .send()
            .await?;

        let account: AccountResponse = read_success(response).await?.json().await?;
        Ok(SignedInUser {
            uid: account.local_id,
            email: account.email.unwrap_or_else(|| email.to_string()),
            id_token: account.id_token,
        })
    }

    /// Write the profile document for a freshly created account
    pub async fn write_profile(
        &self,
        uid: &str,
        id_token: &str,
        profile: &ProfileDocument,
    ) -> AuthResult<()> {
        let url = self.document_url(&self.profile_path(uid));

        let response = self
            .client
            .patch(&url)
            .bearer_auth(id_token)
            .json(&profile.to_fields())
            .send()
            .await?;

        read_success(response).await?;
        tracing::debug!("Wrote profile document for {}", uid);
        Ok(())
    }

    fn stored_user(&self) -> AuthResult<Option<SignedInUser>> {
        Ok(read_json(self.store.as_ref(), keys::IDENTITY_SESSION)?)
    }

    /// ID token of the signed-in user, for authorized document requests
    pub fn id_token(&self) -> AuthResult<Option<String>> {
        Ok(self.stored_user()?.map(|u| u.id_token))
    }

    fn set_current(&self, user: Option<SignedInUser>) -> AuthResult<()> {
        match &user {
            Some(user) => write_json(self.store.as_ref(), keys::IDENTITY_SESSION, user)?,
            None => self.store.remove_item(keys::IDENTITY_SESSION)?,
        }
        self.events.publish(&user.as_ref().map(SignedInUser::session));
        Ok(())
    }
}

#[async_trait(?Send)]
impl AuthBackend for IdentityProvider {
    fn name(&self) -> &'static str {
        "identity"
    }

    async fn sign_up(&self, email: &str, password: &str, confirm_password: &str) -> AuthResult<()> {
        validate_new_password(password, confirm_password)?;

        let user = self.password_request("signUp", email, password).await?;
        tracing::info!("Created provider account {} ({})", user.email, user.uid);

        // The provider signs new accounts in immediately
        let uid = user.uid.clone();
        let id_token = user.id_token.clone();
        let profile = ProfileDocument::new(user.email.clone());
        self.set_current(Some(user))?;

        self.write_profile(&uid, &id_token, &profile).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<()> {
        let user = self
            .password_request("signInWithPassword", email, password)
            .await?;
        tracing::info!("Provider session started for {}", user.email);

        self.set_current(Some(user))
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.set_current(None)?;
        tracing::info!("Provider session cleared");
        Ok(())
    }

    fn current_session(&self) -> AuthResult<Option<Session>> {
        Ok(self.stored_user()?.as_ref().map(SignedInUser::session))
    }

    fn session_events(&self) -> &Publisher<SessionChange> {
        &self.events
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// Pass successful responses through, turn failures into `Provider` errors
async fn read_success(response: Response) -> AuthResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    Err(provider_error(status, &text))
}

/// Extract the provider's own message from an error body
fn provider_error(status: u16, body: &str) -> AuthError {
    match serde_json::from_str::<ProviderErrorBody>(body) {
        Ok(parsed) => AuthError::Provider(parsed.error.message),
        Err(_) if body.trim().is_empty() => {
            AuthError::Provider(format!("Identity provider returned status {status}"))
        }
        Err(_) => AuthError::Provider(body.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn test_config() -> IdentityConfig {
        IdentityConfig {
            api_key: "key-123".to_string(),
            project_id: "market".to_string(),
            app_id: "plugin shop".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = IdentityConfig::default();
        assert_eq!(config.app_id, "default-app-id");
        assert!(!config.is_configured());
        assert!(test_config().is_configured());
    }

    #[test]
    fn test_urls() {
        let provider = IdentityProvider::new(test_config(), MemoryStore::shared());

        assert_eq!(
            provider.accounts_url("signUp"),
            "https://identitytoolkit.googleapis.com/v1/accounts:signUp?key=key-123"
        );
        assert_eq!(
            provider.profile_path("u1"),
            "artifacts/plugin%20shop/users/u1/profile/u1"
        );
        assert_eq!(
            provider.document_url("artifacts/a"),
            "https://firestore.googleapis.com/v1/projects/market/databases/(default)/documents/artifacts/a"
        );
    }

    #[test]
    fn test_provider_error_passthrough() {
        let body = r#"{"error":{"code":400,"message":"EMAIL_EXISTS","errors":[]}}"#;
        assert_eq!(provider_error(400, body).to_string(), "EMAIL_EXISTS");

        assert_eq!(provider_error(502, "Bad Gateway").to_string(), "Bad Gateway");
        assert_eq!(
            provider_error(503, "").to_string(),
            "Identity provider returned status 503"
        );
    }

    #[test]
    fn test_profile_fields() {
        let profile = ProfileDocument {
            email: "ana@example.com".to_string(),
            created_at: "2024-05-01T10:00:00.000Z".to_string(),
        };
        let fields = profile.to_fields();

        assert_eq!(fields["fields"]["email"]["stringValue"], "ana@example.com");
        assert_eq!(
            fields["fields"]["createdAt"]["stringValue"],
            "2024-05-01T10:00:00.000Z"
        );
    }

    #[test]
    fn test_password_request_shape() {
        let body = PasswordRequest {
            email: "a@b.c",
            password: "secret1",
            return_secure_token: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["returnSecureToken"], true);
    }

    #[tokio::test]
    async fn test_sign_out_without_session() {
        let provider = IdentityProvider::new(test_config(), MemoryStore::shared());
        provider.sign_out().await.unwrap();
        assert!(provider.current_session().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_validates_before_request() {
        let provider = IdentityProvider::new(test_config(), MemoryStore::shared());
        let err = provider.sign_up("a@b.c", "abc", "abc").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    fn signed_in(uid: &str, email: &str) -> SignedInUser {
        SignedInUser {
            uid: uid.to_string(),
            email: email.to_string(),
            id_token: format!("token-{uid}"),
        }
    }

    #[test]
    fn test_session_survives_new_provider() {
        let memory = MemoryStore::shared();
        let login_page = IdentityProvider::new(test_config(), memory.clone());
        login_page
            .set_current(Some(signed_in("uid1", "ana@example.com")))
            .unwrap();

        // A fresh page load builds a new adapter over the same store
        let next_page = IdentityProvider::new(test_config(), memory.clone());
        let session = next_page.current_session().unwrap().unwrap();
        assert_eq!(session.email, "ana@example.com");
        assert_eq!(session.user_id.as_deref(), Some("uid1"));
        assert_eq!(next_page.id_token().unwrap().as_deref(), Some("token-uid1"));
    }

    #[tokio::test]
    async fn test_sign_out_clears_stored_session() {
        let memory = MemoryStore::shared();
        let first = IdentityProvider::new(test_config(), memory.clone());
        first
            .set_current(Some(signed_in("uid1", "ana@example.com")))
            .unwrap();

        let second = IdentityProvider::new(test_config(), memory.clone());
        second.sign_out().await.unwrap();

        assert!(memory.get_item(keys::IDENTITY_SESSION).unwrap().is_none());
        assert!(first.current_session().unwrap().is_none());
    }

    #[test]
    fn test_set_current_publishes() {
        let provider = IdentityProvider::new(test_config(), MemoryStore::shared());
        let seen: Rc<RefCell<Vec<SessionChange>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        provider
            .session_events()
            .subscribe(move |change: &SessionChange| sink.borrow_mut().push(change.clone()));

        provider
            .set_current(Some(signed_in("uid2", "bo@example.com")))
            .unwrap();
        provider.set_current(None).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].as_ref().map(|s| s.email.as_str()), Some("bo@example.com"));
        assert!(seen[1].is_none());
    }

    #[test]
    fn test_corrupt_stored_session_is_an_error() {
        let memory = MemoryStore::shared();
        memory.set_item(keys::IDENTITY_SESSION, "{not json").unwrap();

        let provider = IdentityProvider::new(test_config(), memory);
        assert!(matches!(
            provider.current_session(),
            Err(AuthError::Storage(_))
        ));
    }
}
