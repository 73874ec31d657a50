/*
[INPUT]:  Injected EIP-1193 provider (Metamask-like)
[OUTPUT]: Connected wallet info, disconnect validation, account/chain listeners
[POS]:    Wallet layer - Ethereum adapter implementation
[UPDATE]: When provider RPC methods or address formatting change
*/

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::http::{MooniumError, Result};
use crate::types::Blockchain;

use super::adapter::{ListenerHandle, WalletAdapter, WalletPatcher};
use super::info::is_valid_ethereum_address;
use super::provider::{EthereumProvider, EventHandler, ProviderEvent, ProviderEventKind};
use super::{MultichainAddress, WalletInfo, WalletPatch};

const REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
const ACCOUNTS: &str = "eth_accounts";
const CHAIN_ID: &str = "eth_chainId";

/// Adapter for Metamask-like providers
pub struct EthereumAdapter {
    provider: Option<Arc<dyn EthereumProvider>>,
}

impl EthereumAdapter {
    pub fn new(provider: Option<Arc<dyn EthereumProvider>>) -> Self {
        Self { provider }
    }

    fn provider(&self) -> Result<&Arc<dyn EthereumProvider>> {
        self.provider
            .as_ref()
            .filter(|provider| provider.is_metamask())
            .ok_or(MooniumError::ProviderMissing {
                blockchain: Blockchain::Ethereum,
            })
    }
}

#[async_trait]
impl WalletAdapter for EthereumAdapter {
    fn blockchain(&self) -> Blockchain {
        Blockchain::Ethereum
    }

    async fn connect(&self) -> Result<WalletInfo> {
        let provider = self.provider()?;

        let accounts = parse_accounts(provider.request(REQUEST_ACCOUNTS).await?)?;
        let wallet = accounts
            .into_iter()
            .next()
            .ok_or_else(|| MooniumError::Provider("provider returned no accounts".to_string()))?;
        if !is_valid_ethereum_address(&wallet) {
            return Err(MooniumError::Provider(format!(
                "invalid Ethereum address: {wallet}"
            )));
        }

        let chain_id = provider
            .request(CHAIN_ID)
            .await?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| MooniumError::Provider("eth_chainId is not a string".to_string()))?;

        tracing::debug!(wallet = %wallet, chain_id = %chain_id, "ethereum wallet connected");
        Ok(WalletInfo::connected(Blockchain::Ethereum, &wallet, chain_id))
    }

    async fn disconnect(&self) -> Result<WalletInfo> {
        let provider = self.provider()?;

        let accounts = parse_accounts(provider.request(ACCOUNTS).await?)?;
        if accounts.is_empty() {
            return Err(MooniumError::NothingToDisconnect {
                blockchain: Blockchain::Ethereum,
            });
        }

        Ok(WalletInfo::Disconnected)
    }

    fn attach_listener(&self, patcher: WalletPatcher) -> ListenerHandle {
        let Some(provider) = self.provider.clone() else {
            return ListenerHandle::noop();
        };

        let handler: EventHandler = Arc::new(move |event: &ProviderEvent| match event {
            ProviderEvent::ChainChanged(chain_id) => {
                patcher(WalletPatch::ChainId(chain_id.clone()));
            }
            ProviderEvent::AccountsChanged(accounts) => match accounts.first() {
                Some(wallet) => {
                    let id = MultichainAddress::new(Blockchain::Ethereum, wallet);
                    patcher(WalletPatch::Wallet(id.to_string()));
                }
                None => tracing::debug!("ethereum provider reported no accounts; keeping session"),
            },
        });

        let subscriptions = [
            provider.on(ProviderEventKind::ChainChanged, Arc::clone(&handler)),
            provider.on(ProviderEventKind::AccountsChanged, handler),
        ];

        ListenerHandle::new(move || {
            for id in subscriptions {
                provider.remove_listener(id);
            }
        })
    }
}

fn parse_accounts(value: Value) -> Result<Vec<String>> {
    serde_json::from_value(value)
        .map_err(|e| MooniumError::Provider(format!("unexpected accounts payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use crate::wallet::MockEthereumProvider;

    const ACCOUNT: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
    const OTHER_ACCOUNT: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

    fn adapter(provider: &Arc<MockEthereumProvider>) -> EthereumAdapter {
        EthereumAdapter::new(Some(provider.clone() as Arc<dyn EthereumProvider>))
    }

    #[tokio::test]
    async fn test_connect_returns_prefixed_wallet() {
        let provider = Arc::new(MockEthereumProvider::new(vec![ACCOUNT.to_string()], "0x1"));

        let info = adapter(&provider).connect().await.unwrap();

        assert_eq!(
            info,
            WalletInfo::connected(Blockchain::Ethereum, ACCOUNT, "0x1")
        );
        assert_eq!(info.wallet(), Some(format!("ETHEREUM:{ACCOUNT}").as_str()));
    }

    #[tokio::test]
    async fn test_connect_without_provider_fails() {
        let err = EthereumAdapter::new(None).connect().await.unwrap_err();
        assert!(matches!(
            err,
            MooniumError::ProviderMissing {
                blockchain: Blockchain::Ethereum
            }
        ));
    }

    #[tokio::test]
    async fn test_connect_with_non_metamask_provider_fails() {
        let provider = Arc::new(MockEthereumProvider::new(vec![ACCOUNT.to_string()], "0x1").not_metamask());
        let err = adapter(&provider).connect().await.unwrap_err();
        assert_eq!(err.translation_key(), "errors.no_metamask");
    }

    #[tokio::test]
    async fn test_connect_rejected_by_user() {
        let provider = Arc::new(MockEthereumProvider::new(vec![ACCOUNT.to_string()], "0x1"));
        provider.reject_requests("User rejected the request.");

        let err = adapter(&provider).connect().await.unwrap_err();
        assert!(matches!(err, MooniumError::Provider(_)));
    }

    #[tokio::test]
    async fn test_disconnect_requires_connected_account() {
        let provider = Arc::new(MockEthereumProvider::new(Vec::new(), "0x1"));
        let err = adapter(&provider).disconnect().await.unwrap_err();
        assert!(matches!(err, MooniumError::NothingToDisconnect { .. }));

        provider.set_accounts(vec![ACCOUNT.to_string()]);
        assert_eq!(
            adapter(&provider).disconnect().await.unwrap(),
            WalletInfo::Disconnected
        );
        assert_eq!(provider.request_count(REQUEST_ACCOUNTS), 0);
    }

    #[test]
    fn test_listener_patches_and_unsubscribes() {
        let provider = Arc::new(MockEthereumProvider::new(vec![ACCOUNT.to_string()], "0x1"));
        let patches = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&patches);
        let patcher: WalletPatcher = Arc::new(move |patch| sink.lock().unwrap().push(patch));

        let mut handle = adapter(&provider).attach_listener(patcher);
        assert_eq!(provider.listener_count(), 2);

        provider.emit(ProviderEvent::ChainChanged("0x89".to_string()));
        provider.emit(ProviderEvent::AccountsChanged(vec![OTHER_ACCOUNT.to_string()]));
        provider.emit(ProviderEvent::AccountsChanged(Vec::new()));

        assert_eq!(
            *patches.lock().unwrap(),
            vec![
                WalletPatch::ChainId("0x89".to_string()),
                WalletPatch::Wallet(format!("ETHEREUM:{OTHER_ACCOUNT}")),
            ]
        );

        handle.cancel();
        assert_eq!(provider.listener_count(), 0);
        provider.emit(ProviderEvent::ChainChanged("0x5".to_string()));
        assert_eq!(patches.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_listener_without_provider_is_noop() {
        let handle = EthereumAdapter::new(None).attach_listener(Arc::new(|_| {}));
        assert!(!handle.is_active());
    }
}
