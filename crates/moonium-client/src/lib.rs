/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Moonium client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod config;
pub mod http;
pub mod i18n;
pub mod notify;
pub mod storage;
pub mod types;
pub mod wallet;

// Re-export commonly used types from auth
pub use auth::{AuthManager, AuthPhase, AuthState, TokenStore};

pub use config::{resolve_project_slug, AppConfig, Environment};

// Re-export commonly used types from http
pub use http::{ClientConfig, CrudQuery, MooniumClient, MooniumError, Result};

pub use i18n::{Locale, Translator};
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

// Re-export all types
pub use types::*;

// Re-export commonly used types from wallet
pub use wallet::{
    AdapterRegistry, EthereumAdapter, EthereumProvider, InjectedProviders, ListenerHandle,
    SolanaAdapter, SolanaProvider, WalletAdapter, WalletInfo, WalletSession,
};
