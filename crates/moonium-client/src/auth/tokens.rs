/*
[INPUT]:  Access/refresh token pairs issued by the web service
[OUTPUT]: Persisted token retrieval and clearing
[POS]:    Auth layer - token lifecycle storage
[UPDATE]: When token storage keys or persistence rules change
*/

use std::fmt;
use std::sync::Arc;

use crate::http::Result;
use crate::storage::KeyValueStore;
use crate::types::Session;

/// Storage keys owned by the auth session
pub const ACCESS_TOKEN_KEY: &str = "AccessToken";
pub const REFRESH_TOKEN_KEY: &str = "RefreshToken";

/// Persisted bearer token pair.
///
/// Tokens are opaque; their lifetime is decided by the web service only.
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Overwrite both tokens with the pair from `session`.
    ///
    /// If the refresh token cannot be written the previous access token is put
    /// back, so storage never mixes tokens from two sessions.
    pub fn save(&self, session: &Session) -> Result<()> {
        let previous = self.store.get(ACCESS_TOKEN_KEY);
        self.store.set(ACCESS_TOKEN_KEY, &session.access_token)?;
        if let Err(err) = self.store.set(REFRESH_TOKEN_KEY, &session.refresh_token) {
            let restored = match previous {
                Some(token) => self.store.set(ACCESS_TOKEN_KEY, &token),
                None => self.store.remove(ACCESS_TOKEN_KEY),
            };
            if let Err(rollback) = restored {
                tracing::warn!(error = %rollback, "failed to restore previous access token");
            }
            return Err(err);
        }
        Ok(())
    }

    /// Remove both tokens; storage failures are logged, not returned
    pub fn clear(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(err) = self.store.remove(key) {
                tracing::warn!(key, error = %err, "failed to remove token");
            }
        }
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("has_access_token", &self.access_token().is_some())
            .field("has_refresh_token", &self.refresh_token().is_some())
            .finish()
    }
}
