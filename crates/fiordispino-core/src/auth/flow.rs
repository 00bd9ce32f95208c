//! Login, registration and logout against the backend auth endpoints.
//!
//! `AuthFlow` keeps the client `TokenStore` authoritative and mirrors every
//! change to the server-side cookie through the same-origin session
//! endpoint. The mirror is best-effort: its failures are logged, never
//! returned.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::session::{Session, TokenStore};
use crate::api::{ApiClient, ApiError};
use crate::config::Config;
use crate::models::{LoginRequest, RegisterRequest, TokenResponse, UserProfile};

pub const LOGIN_PATH: &str = "/auth/login/";
pub const REGISTRATION_PATH: &str = "/auth/registration/";
pub const LOGOUT_PATH: &str = "/auth/logout/";
pub const CURRENT_USER_PATH: &str = "/auth/user/";

/// Same-origin endpoint that owns the session cookie
pub const SESSION_ENDPOINT: &str = "/api/auth";

/// Body accepted by the session endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum SessionAction {
    Login { token: String },
    Logout,
}

/// Receives session changes for the server-side cookie.
#[async_trait]
pub trait SessionMirror: Send + Sync {
    async fn login(&self, token: &str) -> Result<(), ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
}

/// Forwards session changes to `POST /api/auth` on the app origin.
pub struct HttpSessionMirror {
    client: Client,
    endpoint: String,
}

impl HttpSessionMirror {
    pub fn new(client: Client, app_base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", app_base_url.trim_end_matches('/'), SESSION_ENDPOINT),
        }
    }

    async fn send(&self, action: &SessionAction) -> Result<(), ApiError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(action)
            .send()
            .await
            .map_err(ApiError::Connection)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, body))
        }
    }
}

#[async_trait]
impl SessionMirror for HttpSessionMirror {
    async fn login(&self, token: &str) -> Result<(), ApiError> {
        self.send(&SessionAction::Login {
            token: token.to_string(),
        })
        .await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.send(&SessionAction::Logout).await
    }
}

pub struct AuthFlow {
    api: ApiClient,
    mirror: Arc<dyn SessionMirror>,
}

impl AuthFlow {
    pub fn new(api: ApiClient, mirror: Arc<dyn SessionMirror>) -> Self {
        Self { api, mirror }
    }

    /// Gateway and cookie mirror sharing one connection pool
    pub fn from_config(config: &Config, tokens: TokenStore) -> anyhow::Result<Self> {
        let client = ApiClient::http_client(config)?;
        let mirror = HttpSessionMirror::new(client.clone(), &config.app_base_url);
        let api = ApiClient::with_client(client, &config.api_base_url, tokens);
        Ok(Self::new(api, Arc::new(mirror)))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn tokens(&self) -> &TokenStore {
        self.api.tokens()
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<Session, ApiError> {
        self.authenticate(LOGIN_PATH, credentials).await
    }

    pub async fn register(&self, credentials: &RegisterRequest) -> Result<Session, ApiError> {
        self.authenticate(REGISTRATION_PATH, credentials).await
    }

    async fn authenticate<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Session, ApiError> {
        let issued: TokenResponse = self
            .api
            .post_anonymous(path, body)
            .await
            .map_err(ApiError::into_validation)?;

        if issued.key.is_empty() {
            return Err(ApiError::InvalidResponse("Backend issued an empty token".into()));
        }

        // Profile is read with the issued key, independent of the store
        let issued_api = self.api.with_tokens(TokenStore::with_token(&issued.key));
        let user: UserProfile = match issued_api.get(CURRENT_USER_PATH, &[], None).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Unable to retrieve user profile, discarding token");
                return Err(e);
            }
        };

        let tokens = self.tokens();
        tokens.set_token(&issued.key);
        tokens.set_user(&user);

        if let Err(e) = self.mirror.login(&issued.key).await {
            warn!(error = %e, "Failed to mirror session to server cookie");
        }

        info!(username = %user.username, "Session started");
        Ok(Session {
            token: Some(issued.key),
            user: Some(user),
        })
    }

    /// End the session. Local state is cleared even if the backend call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if !self.tokens().is_authenticated() {
            return Ok(());
        }

        let result = self
            .api
            .post_empty::<serde_json::Value>(LOGOUT_PATH, None)
            .await;
        if let Err(ref e) = result {
            warn!(error = %e, "Backend logout failed");
        }

        self.end_session().await;
        info!("Session ended");
        result.map(|_| ())
    }

    /// Fetch the profile of the session user; `None` when logged out.
    ///
    /// A 401 means the backend no longer accepts the token, so the session
    /// is dropped locally before the error is returned.
    pub async fn current_user(&self) -> Result<Option<UserProfile>, ApiError> {
        if !self.tokens().is_authenticated() {
            return Ok(None);
        }

        match self.api.get::<UserProfile>(CURRENT_USER_PATH, &[], None).await {
            Ok(user) => {
                self.tokens().set_user(&user);
                Ok(Some(user))
            }
            Err(e) if e.is_unauthorized() => {
                info!("Backend rejected session token");
                self.end_session().await;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Last profile snapshot, hidden when no token is held
    pub fn cached_user(&self) -> Option<UserProfile> {
        self.tokens().session().user
    }

    async fn end_session(&self) {
        self.tokens().clear();
        if let Err(e) = self.mirror.logout().await {
            warn!(error = %e, "Failed to clear server cookie");
        }
    }
}
