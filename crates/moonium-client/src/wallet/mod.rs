/*
[INPUT]:  Injected wallet providers, durable store, translator, notifier
[OUTPUT]: Unified wallet connection state across Ethereum and Solana
[POS]:    Wallet layer - adapters and the session manager over them
[UPDATE]: When adding blockchains or changing the session lifecycle
*/

pub mod adapter;
pub mod ethereum;
pub mod info;
pub mod mock;
pub mod provider;
pub mod session;
pub mod solana;

pub use adapter::{AdapterRegistry, ListenerHandle, WalletAdapter, WalletPatcher};
pub use ethereum::EthereumAdapter;
pub use info::{ConnectedWallet, MultichainAddress, WalletInfo, WalletPatch};
pub use mock::{MockEthereumProvider, MockSolanaProvider};
pub use provider::{
    EthereumProvider, EventHandler, InjectedProviders, ProviderEvent, ProviderEventKind,
    SolanaProvider, SubscriptionId,
};
pub use session::{WALLET_INFO_KEY, WalletSession};
pub use solana::{SolanaAdapter, UNKNOWN_CLUSTER_ID};
