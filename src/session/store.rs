use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use super::state::StateCell;
use super::storage::{SessionStorage, ACCESS_TOKEN_KEY, CURRENT_USER_KEY, REFRESH_TOKEN_KEY};
use crate::domain::{AuthResponse, TokenPair, User};
use crate::error::StorageError;

/// Tokens plus the current-user snapshot, backed by [`SessionStorage`].
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    current_user: StateCell<Option<User>>,
}

impl SessionStore {
    /// Builds the store and restores a previous session from storage.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let store = Self {
            storage,
            current_user: StateCell::new(None),
        };
        store.restore();
        store
    }

    fn restore(&self) {
        let (Some(raw_user), Some(_)) = (self.storage.get(CURRENT_USER_KEY), self.storage.get(ACCESS_TOKEN_KEY)) else {
            return;
        };
        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => {
                info!(email = %user.email, "Restored session");
                self.current_user.set(Some(user));
            }
            Err(e) => {
                warn!(error = %e, "Stored user is malformed, clearing session");
                if let Err(e) = self.clear() {
                    warn!(error = %e, "Failed to clear session storage");
                }
            }
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.storage.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.storage.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn current_user(&self) -> Option<User> {
        self.current_user.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current_user.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some() && self.current_user.get().is_some()
    }

    /// Persists all three keys and publishes the user.
    pub fn establish(&self, auth: &AuthResponse) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&auth.user).map_err(|e| StorageError::Encoding(e.to_string()))?;
        self.storage.set(ACCESS_TOKEN_KEY, &auth.access_token)?;
        self.storage.set(REFRESH_TOKEN_KEY, &auth.refresh_token)?;
        self.storage.set(CURRENT_USER_KEY, &encoded)?;
        self.current_user.set(Some(auth.user.clone()));
        Ok(())
    }

    pub fn store_tokens(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        self.storage.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        self.storage.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)
    }

    /// Removes every key and publishes `None`. The user is unpublished even
    /// if storage fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        let results = [
            self.storage.remove(ACCESS_TOKEN_KEY),
            self.storage.remove(REFRESH_TOKEN_KEY),
            self.storage.remove(CURRENT_USER_KEY),
        ];
        self.current_user.set(None);
        results.into_iter().collect()
    }

    pub fn storage(&self) -> &Arc<dyn SessionStorage> {
        &self.storage
    }
}
