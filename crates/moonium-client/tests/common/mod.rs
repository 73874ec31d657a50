/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for moonium-client tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use moonium_client::wallet::{MockEthereumProvider, MockSolanaProvider};
use moonium_client::{
    AdapterRegistry, AuthManager, InjectedProviders, Locale, MemoryStore, MooniumClient,
    RecordingNotifier, TokenStore, Translator, WalletSession,
};
use wiremock::MockServer;

pub const ETH_ACCOUNT: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
pub const ETH_ACCOUNT_2: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";
pub const SOL_PUBKEY: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn translator() -> Arc<Translator> {
    Arc::new(Translator::new(Locale::En))
}

/// Unique scratch directory under the system temp dir
pub fn temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{prefix}-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

/// Successful auth body for the given token pair and admin name
pub fn auth_body(access: &str, refresh: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "access": access,
        "refresh": refresh,
        "payload": {
            "name": name,
            "surname": "Rossi",
            "email": "admin@moonia.it"
        }
    })
}

pub struct AuthFixture {
    pub server: MockServer,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub manager: AuthManager,
}

pub async fn auth_fixture() -> AuthFixture {
    let server = setup_mock_server().await;
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let client = MooniumClient::new(&server.uri()).expect("mock server url");
    let manager = AuthManager::new(
        client,
        TokenStore::new(store.clone()),
        translator(),
        notifier.clone(),
    );
    AuthFixture {
        server,
        store,
        notifier,
        manager,
    }
}

/// Injected providers plus the store and notifier a wallet session needs
pub struct WalletFixture {
    pub ethereum: Arc<MockEthereumProvider>,
    pub solana: Arc<MockSolanaProvider>,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl WalletFixture {
    pub fn new() -> Self {
        Self {
            ethereum: Arc::new(MockEthereumProvider::new(vec![ETH_ACCOUNT.to_string()], "0x1")),
            solana: Arc::new(MockSolanaProvider::new(SOL_PUBKEY).with_events()),
            store: Arc::new(MemoryStore::new()),
            notifier: Arc::new(RecordingNotifier::new()),
        }
    }

    pub fn registry(&self) -> AdapterRegistry {
        let providers = InjectedProviders::new()
            .with_ethereum(self.ethereum.clone())
            .with_solana(self.solana.clone());
        AdapterRegistry::from_providers(&providers)
    }

    pub fn session(&self) -> WalletSession {
        self.session_with(self.registry())
    }

    pub fn session_with(&self, registry: AdapterRegistry) -> WalletSession {
        WalletSession::restore(
            registry,
            self.store.clone(),
            translator(),
            self.notifier.clone(),
        )
    }
}
