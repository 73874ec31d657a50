/*
[INPUT]:  Browser-injected wallet provider objects (Metamask-like, Phantom-like)
[OUTPUT]: Typed provider capabilities consumed by the wallet adapters
[POS]:    Wallet layer - external dependency seam around injected providers
[UPDATE]: When a provider exposes new methods or events the adapters need
*/

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::http::Result;

/// Identifier returned when a listener is registered on a provider
pub type SubscriptionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEventKind {
    /// `chainChanged`
    ChainChanged,
    /// `accountsChanged` (Ethereum) / `accountChanged` (Solana)
    AccountsChanged,
}

impl ProviderEventKind {
    pub fn event_name(&self) -> &'static str {
        match self {
            ProviderEventKind::ChainChanged => "chainChanged",
            ProviderEventKind::AccountsChanged => "accountsChanged",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    ChainChanged(String),
    /// Raw addresses, most recently selected first; empty when locked
    AccountsChanged(Vec<String>),
}

impl ProviderEvent {
    pub fn kind(&self) -> ProviderEventKind {
        match self {
            ProviderEvent::ChainChanged(_) => ProviderEventKind::ChainChanged,
            ProviderEvent::AccountsChanged(_) => ProviderEventKind::AccountsChanged,
        }
    }
}

pub type EventHandler = Arc<dyn Fn(&ProviderEvent) + Send + Sync>;

/// EIP-1193 style provider (`window.ethereum`)
#[async_trait]
pub trait EthereumProvider: Send + Sync {
    /// Self-identification flag (`isMetaMask`)
    fn is_metamask(&self) -> bool;

    /// JSON-RPC request without params, e.g. `eth_requestAccounts`, `eth_chainId`.
    ///
    /// May suspend until the user answers a prompt inside the provider.
    async fn request(&self, method: &str) -> Result<Value>;

    fn on(&self, kind: ProviderEventKind, handler: EventHandler) -> SubscriptionId;

    fn remove_listener(&self, id: SubscriptionId);
}

/// Phantom style provider (`window.solana`)
#[async_trait]
pub trait SolanaProvider: Send + Sync {
    /// Self-identification flag (`isPhantom`)
    fn is_phantom(&self) -> bool;

    fn is_connected(&self) -> bool;

    /// Prompt for account access; resolves to the base58 public key.
    async fn connect(&self) -> Result<String>;

    /// Register an event listener; `None` when the provider has no event support.
    fn on(&self, _kind: ProviderEventKind, _handler: EventHandler) -> Option<SubscriptionId> {
        None
    }

    fn remove_listener(&self, _id: SubscriptionId) {}
}

/// The set of providers injected into the running client
#[derive(Clone, Default)]
pub struct InjectedProviders {
    pub ethereum: Option<Arc<dyn EthereumProvider>>,
    pub solana: Option<Arc<dyn SolanaProvider>>,
}

impl InjectedProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ethereum(mut self, provider: Arc<dyn EthereumProvider>) -> Self {
        self.ethereum = Some(provider);
        self
    }

    pub fn with_solana(mut self, provider: Arc<dyn SolanaProvider>) -> Self {
        self.solana = Some(provider);
        self
    }
}

impl fmt::Debug for InjectedProviders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectedProviders")
            .field("ethereum", &self.ethereum.is_some())
            .field("solana", &self.solana.is_some())
            .finish()
    }
}
