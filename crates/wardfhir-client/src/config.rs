use std::collections::HashMap;
use std::sync::RwLock;

use crate::auth::{Credentials, authorization_value};
use crate::error::{ClientError, Result};
use crate::store::TokenStore;

/// Content type sent with every request.
pub const CONTENT_TYPE_FHIR_JSON: &str = "application/json+fhir; charset=utf-8";

const CONTENT_TYPE: &str = "Content-Type";
const AUTHORIZATION: &str = "Authorization";

/// Single source of truth for server connectivity and identity.
///
/// Constructed once via [`FhirClientConfig::builder`] and shared by reference
/// (typically behind an `Arc`) — explicit dependency injection rather than
/// ambient global state, so independent configs can coexist in tests.
/// The token/header state is the only mutable part; mutations are
/// last-writer-wins.
#[derive(Debug)]
pub struct FhirClientConfig {
    base_url: String,
    credentials: Option<Credentials>,
    oauth_client_id: Option<String>,
    oauth_redirect_uri: Option<String>,
    store: TokenStore,
    state: RwLock<AuthState>,
}

#[derive(Debug, Clone)]
struct AuthState {
    token: Option<String>,
    headers: HashMap<String, String>,
}

impl FhirClientConfig {
    pub fn builder(base_url: impl Into<String>) -> FhirClientConfigBuilder {
        FhirClientConfigBuilder {
            base_url: base_url.into(),
            credentials: None,
            oauth_client_id: None,
            oauth_redirect_uri: None,
            store: None,
        }
    }

    /// Current header set. Always contains the FHIR JSON content type;
    /// Authorization reflects the active scheme (Bearer over Basic).
    pub fn headers(&self) -> HashMap<String, String> {
        self.read_state().headers.clone()
    }

    /// Insert or overwrite a custom header. Only non-empty names are
    /// accepted; values are taken as-is.
    pub fn set_custom_header(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(ClientError::invalid_argument(
                "header name must not be empty",
            ));
        }
        self.write_state().headers.insert(name, value.into());
        Ok(())
    }

    /// Switch to Bearer mode and persist the token.
    ///
    /// Idempotent; under concurrent calls the last writer wins.
    pub fn set_auth_token(&self, token: impl Into<String>) {
        let token = token.into();
        {
            let mut state = self.write_state();
            state
                .headers
                .insert(AUTHORIZATION.to_string(), format!("Bearer {token}"));
            state.token = Some(token.clone());
        }
        self.store.set(Some(&token));
    }

    /// Drop the token from memory and from the store.
    ///
    /// Authorization falls back to Basic mode iff credentials were supplied
    /// at build time; otherwise the header is removed entirely.
    pub fn clear_auth_token(&self) {
        {
            let mut state = self.write_state();
            state.token = None;
            match authorization_value(self.credentials.as_ref(), None) {
                Ok(value) => {
                    state.headers.insert(AUTHORIZATION.to_string(), value);
                }
                Err(_) => {
                    state.headers.remove(AUTHORIZATION);
                }
            }
        }
        self.store.set(None);
    }

    /// Whether a token is currently held in memory. This reflects local
    /// state only, not token validity against the server.
    pub fn is_authenticated(&self) -> bool {
        self.read_state().token.is_some()
    }

    /// The in-memory bearer token, if any.
    pub fn auth_token(&self) -> Option<String> {
        self.read_state().token.clone()
    }

    /// Configured base URL, unchanged. No trailing-slash normalization is
    /// applied anywhere: request URLs are built by direct concatenation, so
    /// the base URL is expected to end with `/`.
    pub fn backend_url(&self) -> &str {
        &self.base_url
    }

    pub fn oauth_client_id(&self) -> Option<&str> {
        self.oauth_client_id.as_deref()
    }

    pub fn oauth_redirect_uri(&self) -> Option<&str> {
        self.oauth_redirect_uri.as_deref()
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, AuthState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// One-time setup for [`FhirClientConfig`].
pub struct FhirClientConfigBuilder {
    base_url: String,
    credentials: Option<Credentials>,
    oauth_client_id: Option<String>,
    oauth_redirect_uri: Option<String>,
    store: Option<TokenStore>,
}

impl FhirClientConfigBuilder {
    pub fn credentials(mut self, api_user: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(api_user, api_key));
        self
    }

    pub fn oauth_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.oauth_client_id = Some(client_id.into());
        self
    }

    pub fn oauth_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.oauth_redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Use a specific token store instead of the default one under the home
    /// directory.
    pub fn token_store(mut self, store: TokenStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Validate the base URL, load any persisted token, and compute the
    /// initial header set.
    ///
    /// A persisted token puts Authorization in Bearer mode immediately;
    /// otherwise credentials put it in Basic mode. With neither available the
    /// header stays absent until [`FhirClientConfig::set_auth_token`].
    pub fn build(self) -> Result<FhirClientConfig> {
        if self.base_url.is_empty() {
            return Err(ClientError::configuration("base URL must not be empty"));
        }
        let store = self.store.unwrap_or_default();
        let token = store.get();

        let mut headers = HashMap::new();
        headers.insert(
            CONTENT_TYPE.to_string(),
            CONTENT_TYPE_FHIR_JSON.to_string(),
        );
        if token.is_some() || self.credentials.is_some() {
            headers.insert(
                AUTHORIZATION.to_string(),
                authorization_value(self.credentials.as_ref(), token.as_deref())?,
            );
        }

        Ok(FhirClientConfig {
            base_url: self.base_url,
            credentials: self.credentials,
            oauth_client_id: self.oauth_client_id,
            oauth_redirect_uri: self.oauth_redirect_uri,
            store,
            state: RwLock::new(AuthState { token, headers }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> FhirClientConfig {
        FhirClientConfig::builder("https://fhir.example.org/")
            .credentials("user", "key")
            .token_store(TokenStore::in_memory())
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let err = FhirClientConfig::builder("")
            .token_store(TokenStore::in_memory())
            .build()
            .unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn test_initial_headers_basic_mode() {
        let config = test_config();
        let headers = config.headers();
        assert_eq!(
            headers.get("Content-Type").map(String::as_str),
            Some(CONTENT_TYPE_FHIR_JSON)
        );
        assert_eq!(
            headers.get("Authorization").map(String::as_str),
            Some("Basic dXNlcjprZXk=")
        );
        assert!(!config.is_authenticated());
    }

    #[test]
    fn test_no_identity_defers_authorization() {
        let config = FhirClientConfig::builder("https://fhir.example.org/")
            .token_store(TokenStore::in_memory())
            .build()
            .unwrap();
        assert!(!config.headers().contains_key("Authorization"));

        config.set_auth_token("abc123");
        assert_eq!(
            config.headers().get("Authorization").map(String::as_str),
            Some("Bearer abc123")
        );
    }

    #[test]
    fn test_set_auth_token_switches_to_bearer() {
        let config = test_config();
        config.set_auth_token("abc123");
        assert_eq!(
            config.headers().get("Authorization").map(String::as_str),
            Some("Bearer abc123")
        );
        assert!(config.is_authenticated());
    }

    #[test]
    fn test_set_auth_token_idempotent() {
        let config = test_config();
        config.set_auth_token("abc123");
        let before = config.headers();
        config.set_auth_token("abc123");
        assert_eq!(before, config.headers());
    }

    #[test]
    fn test_clear_falls_back_to_basic_with_credentials() {
        let config = test_config();
        config.set_auth_token("abc123");
        config.clear_auth_token();
        assert!(!config.is_authenticated());
        assert_eq!(
            config.headers().get("Authorization").map(String::as_str),
            Some("Basic dXNlcjprZXk=")
        );
    }

    #[test]
    fn test_clear_removes_authorization_without_credentials() {
        let config = FhirClientConfig::builder("https://fhir.example.org/")
            .token_store(TokenStore::in_memory())
            .build()
            .unwrap();
        config.set_auth_token("abc123");
        config.clear_auth_token();
        assert!(!config.is_authenticated());
        assert!(!config.headers().contains_key("Authorization"));
    }

    #[test]
    fn test_token_persisted_through_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = FhirClientConfig::builder("https://fhir.example.org/")
            .credentials("user", "key")
            .token_store(TokenStore::with_dir(dir.path()))
            .build()
            .unwrap();
        config.set_auth_token("abc123");

        // A fresh store over the same directory sees the token, and a fresh
        // config starts in Bearer mode from it.
        assert_eq!(
            TokenStore::with_dir(dir.path()).get(),
            Some("abc123".to_string())
        );
        let reloaded = FhirClientConfig::builder("https://fhir.example.org/")
            .credentials("user", "key")
            .token_store(TokenStore::with_dir(dir.path()))
            .build()
            .unwrap();
        assert!(reloaded.is_authenticated());
        assert_eq!(
            reloaded.headers().get("Authorization").map(String::as_str),
            Some("Bearer abc123")
        );
    }

    #[test]
    fn test_custom_header() {
        let config = test_config();
        config.set_custom_header("X-Session-Id", "s-1").unwrap();
        assert_eq!(
            config.headers().get("X-Session-Id").map(String::as_str),
            Some("s-1")
        );

        config.set_custom_header("X-Session-Id", "s-2").unwrap();
        assert_eq!(
            config.headers().get("X-Session-Id").map(String::as_str),
            Some("s-2")
        );
    }

    #[test]
    fn test_custom_header_empty_name_rejected() {
        let config = test_config();
        let err = config.set_custom_header("", "value").unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument(_)));
    }

    #[test]
    fn test_backend_url_unchanged() {
        let config = test_config();
        assert_eq!(config.backend_url(), "https://fhir.example.org/");
    }

    #[test]
    fn test_oauth_accessors() {
        let config = FhirClientConfig::builder("https://fhir.example.org/")
            .credentials("user", "key")
            .oauth_client_id("ward-app")
            .oauth_redirect_uri("https://app.example.org/callback")
            .token_store(TokenStore::in_memory())
            .build()
            .unwrap();
        assert_eq!(config.oauth_client_id(), Some("ward-app"));
        assert_eq!(
            config.oauth_redirect_uri(),
            Some("https://app.example.org/callback")
        );
    }
}
