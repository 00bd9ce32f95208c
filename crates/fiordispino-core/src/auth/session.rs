use std::sync::Arc;

use tracing::{debug, warn};

use super::storage::{MemoryStorage, Storage, StorageError};
use crate::models::UserProfile;

/// Storage key holding the bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the serialized profile snapshot
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Client-side token and profile persistence.
///
/// Storage failures are logged and read as "absent"; no method here fails.
/// Writes are last-writer-wins. Clone is cheap and shares the backend.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn Storage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Process-local store seeded with a token, e.g. from a request cookie.
    pub fn with_token(token: &str) -> Self {
        let store = Self::in_memory();
        store.set_token(token);
        store
    }

    pub fn set_token(&self, token: &str) {
        if let Err(e) = self.storage.set_item(TOKEN_KEY, token) {
            warn!(error = %e, "Failed to store token");
        }
    }

    pub fn token(&self) -> Option<String> {
        match self.storage.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read token, treating as absent");
                None
            }
        }
    }

    pub fn remove_token(&self) {
        if let Err(e) = self.storage.remove_item(TOKEN_KEY) {
            warn!(error = %e, "Failed to remove token");
        }
    }

    pub fn set_user(&self, user: &UserProfile) {
        let result = serde_json::to_string(user)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set_item(USER_KEY, &json));
        if let Err(e) = result {
            warn!(error = %e, "Failed to store user profile");
        }
    }

    /// Raw cached profile. Prefer `session()`, which hides it when no token is held.
    pub fn user(&self) -> Option<UserProfile> {
        let json = match self.storage.get_item(USER_KEY) {
            Ok(json) => json?,
            Err(e) => {
                warn!(error = %e, "Failed to read user profile");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                debug!(error = %e, "Cached user profile is unreadable");
                None
            }
        }
    }

    pub fn remove_user(&self) {
        if let Err(e) = self.storage.remove_item(USER_KEY) {
            warn!(error = %e, "Failed to remove user profile");
        }
    }

    /// Drop both the token and the profile snapshot.
    pub fn clear(&self) {
        self.remove_token();
        self.remove_user();
    }

    pub fn session(&self) -> Session {
        match self.token() {
            Some(token) => Session {
                token: Some(token),
                user: self.user(),
            },
            None => Session::default(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}
