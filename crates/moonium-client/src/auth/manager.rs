/*
[INPUT]:  Moonium HTTP client, token store, translator and notifier
[OUTPUT]: Authenticated admin identity and persisted token pair
[POS]:    Auth layer - orchestrates login, startup refresh and logout
[UPDATE]: When auth endpoints or session state rules change
*/

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::http::{MooniumClient, MooniumError, Result};
use crate::i18n::Translator;
use crate::notify::{Notification, Notifier};
use crate::types::{Admin, AuthResponse, Credentials, Session};

use super::TokenStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    Idle,
    /// Silent refresh from a stored refresh token
    Refreshing,
    /// Explicit login in flight
    Authenticating,
    Authenticated,
    Failed,
}

/// Observable auth state.
///
/// `error` holds a translated message, or is empty when there is nothing to show.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    pub admin: Option<Admin>,
    pub loading: bool,
    pub error: String,
    pub phase: AuthPhase,
}

/// Owns the admin identity and the persisted token pair
pub struct AuthManager {
    client: MooniumClient,
    tokens: TokenStore,
    translator: Arc<Translator>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<AuthState>,
    epoch: AtomicU64,
}

impl AuthManager {
    pub fn new(
        client: MooniumClient,
        tokens: TokenStore,
        translator: Arc<Translator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            client,
            tokens,
            translator,
            notifier,
            state: RwLock::new(AuthState::default()),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn client(&self) -> &MooniumClient {
        &self.client
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn state(&self) -> AuthState {
        read(&self.state).clone()
    }

    pub fn admin(&self) -> Option<Admin> {
        read(&self.state).admin.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        read(&self.state).admin.is_some()
    }

    /// Bearer token for API calls made on behalf of the admin
    pub fn access_token(&self) -> Option<String> {
        self.tokens.access_token()
    }

    /// Startup hook: one silent refresh attempt, never retried or scheduled.
    pub async fn initialize(&self) -> AuthState {
        if let Err(err) = self.refresh().await {
            tracing::debug!(error = %err, "no session restored at startup");
        }
        self.state()
    }

    /// Authenticate with email and password.
    ///
    /// Tokens are persisted only for a complete response. Failures are also
    /// shown as a notification, except `Superseded` when a newer operation won.
    pub async fn login(&self, credentials: &Credentials) -> Result<Admin> {
        let epoch = self.begin(AuthPhase::Authenticating);
        tracing::info!(email = %credentials.email, "admin login");

        let result = self
            .client
            .login(credentials)
            .await
            .and_then(|response| complete(response, MooniumError::AuthFailed));

        match self.settle(epoch, result) {
            Ok(admin) => Ok(admin),
            Err(MooniumError::Superseded) => Err(MooniumError::Superseded),
            Err(err) => {
                tracing::warn!(error = %err, "admin login failed");
                self.notifier
                    .notify(Notification::from_error(&err, &self.translator));
                Err(err)
            }
        }
    }

    /// Renew the session from the stored refresh token.
    ///
    /// A missing token fails with `TokenExpired` and leaves `error` empty.
    /// Any other failure drops the in-memory identity but keeps storage as is.
    pub async fn refresh(&self) -> Result<Admin> {
        let epoch = self.begin(AuthPhase::Refreshing);

        let Some(refresh_token) = self.tokens.refresh_token() else {
            self.update(epoch, |state| {
                *state = AuthState {
                    phase: AuthPhase::Failed,
                    ..AuthState::default()
                };
            });
            return Err(MooniumError::TokenExpired);
        };

        let result = self
            .client
            .refresh(&refresh_token)
            .await
            .and_then(|response| complete(response, MooniumError::TokenExpired));

        self.settle(epoch, result)
    }

    /// Forget the session locally; no network call.
    pub fn logout(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.tokens.clear();
        *write(&self.state) = AuthState::default();
        tracing::info!("admin logged out");
    }

    fn begin(&self, phase: AuthPhase) -> u64 {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = write(&self.state);
        state.loading = true;
        state.error.clear();
        state.phase = phase;
        epoch
    }

    /// Apply a finished request to storage and state.
    ///
    /// A superseded request touches neither and fails with `Superseded`.
    fn settle(&self, epoch: u64, result: Result<Session>) -> Result<Admin> {
        if !self.is_current(epoch) {
            tracing::debug!(ok = result.is_ok(), "discarding superseded auth response");
            return Err(MooniumError::Superseded);
        }
        let result = result.and_then(|session| {
            self.tokens.save(&session)?;
            Ok(session.admin)
        });

        match &result {
            Ok(admin) => self.update(epoch, |state| {
                state.admin = Some(admin.clone());
                state.loading = false;
                state.phase = AuthPhase::Authenticated;
            }),
            Err(err) => {
                let message = self.translator.translate(err.translation_key());
                self.update(epoch, |state| {
                    if state.phase == AuthPhase::Refreshing {
                        state.admin = None;
                    }
                    state.error = message;
                    state.loading = false;
                    state.phase = if state.admin.is_some() {
                        AuthPhase::Authenticated
                    } else {
                        AuthPhase::Failed
                    };
                });
            }
        }
        result
    }

    fn update(&self, epoch: u64, apply: impl FnOnce(&mut AuthState)) {
        let mut state = write(&self.state);
        if self.is_current(epoch) {
            apply(&mut state);
        }
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == epoch
    }
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("base_url", &self.client.base_url().as_str())
            .field("state", &self.state())
            .finish()
    }
}

fn complete(response: AuthResponse, rejection: MooniumError) -> Result<Session> {
    response.into_session().ok_or(rejection)
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::auth::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
    use crate::i18n::Locale;
    use crate::notify::RecordingNotifier;
    use crate::storage::{KeyValueStore, MemoryStore};

    struct Fixture {
        server: MockServer,
        store: Arc<MemoryStore>,
        notifier: Arc<RecordingNotifier>,
        manager: AuthManager,
    }

    async fn fixture() -> Fixture {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let manager = AuthManager::new(
            MooniumClient::new(&server.uri()).unwrap(),
            TokenStore::new(store.clone()),
            Arc::new(Translator::new(Locale::En)),
            notifier.clone(),
        );
        Fixture {
            server,
            store,
            notifier,
            manager,
        }
    }

    #[tokio::test]
    async fn test_refresh_rejected_keeps_storage_and_sets_error() {
        let f = fixture().await;
        f.store.set(ACCESS_TOKEN_KEY, "old-a").unwrap();
        f.store.set(REFRESH_TOKEN_KEY, "old-r").unwrap();

        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .and(body_json(serde_json::json!({"refreshToken": "old-r"})))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&f.server)
            .await;

        let state = f.manager.initialize().await;

        assert!(state.admin.is_none());
        assert!(!state.loading);
        assert_eq!(state.phase, AuthPhase::Failed);
        assert_eq!(
            state.error,
            Translator::new(Locale::En).translate("errors.token_expired")
        );
        assert_eq!(f.store.get(REFRESH_TOKEN_KEY), Some("old-r".to_string()));
        assert_eq!(f.store.get(ACCESS_TOKEN_KEY), Some("old-a".to_string()));
        assert!(f.notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_success_replaces_both_tokens() {
        let f = fixture().await;
        f.store.set(REFRESH_TOKEN_KEY, "old-r").unwrap();

        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "access": "new-a",
                "refresh": "new-r",
                "payload": {"name": "X", "surname": "Y", "email": "x@moonia.it"}
            })))
            .mount(&f.server)
            .await;

        let admin = f.manager.refresh().await.unwrap();

        assert_eq!(admin.name, "X");
        assert_eq!(f.manager.access_token(), Some("new-a".to_string()));
        assert_eq!(f.store.get(REFRESH_TOKEN_KEY), Some("new-r".to_string()));
        assert_eq!(f.manager.state().phase, AuthPhase::Authenticated);
    }

    #[tokio::test]
    async fn test_refresh_with_ok_status_is_not_success() {
        let f = fixture().await;
        f.store.set(REFRESH_TOKEN_KEY, "old-r").unwrap();

        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access": "new-a",
                "refresh": "new-r",
                "payload": {"name": "X"}
            })))
            .mount(&f.server)
            .await;

        let err = f.manager.refresh().await.unwrap_err();
        assert!(matches!(err, MooniumError::TokenExpired));
        assert!(f.store.get(ACCESS_TOKEN_KEY).is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_tokens_and_state() {
        let f = fixture().await;
        f.store.set(ACCESS_TOKEN_KEY, "a").unwrap();
        f.store.set(REFRESH_TOKEN_KEY, "r").unwrap();

        f.manager.logout();

        assert!(f.store.is_empty());
        assert_eq!(f.manager.state(), AuthState::default());
    }
}
