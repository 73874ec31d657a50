/*
[INPUT]:  Per-chain wallet adapters and injected providers
[OUTPUT]: Uniform connect/disconnect/listen capability and chain-tag dispatch
[POS]:    Wallet layer - adapter contract shared by every blockchain variant
[UPDATE]: When adding a blockchain or changing the adapter contract
*/

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::http::{MooniumError, Result};
use crate::types::Blockchain;

use super::{EthereumAdapter, InjectedProviders, SolanaAdapter, WalletInfo, WalletPatch};

/// Callback used by listeners to patch the session state in place
pub type WalletPatcher = Arc<dyn Fn(WalletPatch) + Send + Sync>;

/// Capability contract every blockchain adapter satisfies
///
/// Implement this trait for each supported chain. Adapters never touch
/// storage; the session decides what to persist.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    fn blockchain(&self) -> Blockchain;

    /// Ask the provider for account access and read the current network.
    ///
    /// Returns a connected state with a chain-prefixed wallet identifier.
    async fn connect(&self) -> Result<WalletInfo>;

    /// Validate the provider still has something to disconnect.
    ///
    /// Always resolves to [`WalletInfo::Disconnected`]; provider permissions
    /// are not revoked.
    async fn disconnect(&self) -> Result<WalletInfo>;

    /// Subscribe to account/chain changes; dropping or cancelling the handle
    /// removes every listener added here.
    fn attach_listener(&self, patcher: WalletPatcher) -> ListenerHandle;
}

/// Cancellation handle for a listener subscription.
///
/// Cancelling is idempotent and also happens on drop.
pub struct ListenerHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ListenerHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Handle for providers without event support
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Maps a chain tag to its adapter
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<Blockchain, Arc<dyn WalletAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the Ethereum and Solana adapters over the injected providers
    pub fn from_providers(providers: &InjectedProviders) -> Self {
        Self::new()
            .with_adapter(Arc::new(EthereumAdapter::new(providers.ethereum.clone())))
            .with_adapter(Arc::new(SolanaAdapter::new(providers.solana.clone())))
    }

    /// Register an adapter under its own chain tag, replacing any previous one
    pub fn with_adapter(mut self, adapter: Arc<dyn WalletAdapter>) -> Self {
        self.adapters.insert(adapter.blockchain(), adapter);
        self
    }

    pub fn get(&self, blockchain: Blockchain) -> Result<Arc<dyn WalletAdapter>> {
        self.adapters
            .get(&blockchain)
            .cloned()
            .ok_or(MooniumError::UnsupportedBlockchain(blockchain))
    }

    pub fn supported(&self) -> Vec<Blockchain> {
        Blockchain::ALL
            .into_iter()
            .filter(|chain| self.adapters.contains_key(chain))
            .collect()
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("supported", &self.supported())
            .finish()
    }
}
