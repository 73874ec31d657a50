/*
[INPUT]:  Injected Phantom-like provider
[OUTPUT]: Connected wallet info, disconnect validation, account listener
[POS]:    Wallet layer - Solana adapter implementation
[UPDATE]: When the provider exposes cluster information or new events
*/

use std::sync::Arc;

use async_trait::async_trait;

use crate::http::{MooniumError, Result};
use crate::types::Blockchain;

use super::adapter::{ListenerHandle, WalletAdapter, WalletPatcher};
use super::info::is_valid_solana_address;
use super::provider::{EventHandler, ProviderEvent, ProviderEventKind, SolanaProvider};
use super::{MultichainAddress, WalletInfo, WalletPatch};

/// Phantom does not report the selected cluster, so sessions carry a placeholder.
pub const UNKNOWN_CLUSTER_ID: &str = "-1";

/// Adapter for Phantom-like providers
pub struct SolanaAdapter {
    provider: Option<Arc<dyn SolanaProvider>>,
}

impl SolanaAdapter {
    pub fn new(provider: Option<Arc<dyn SolanaProvider>>) -> Self {
        Self { provider }
    }

    fn provider(&self) -> Result<&Arc<dyn SolanaProvider>> {
        self.provider
            .as_ref()
            .filter(|provider| provider.is_phantom())
            .ok_or(MooniumError::ProviderMissing {
                blockchain: Blockchain::Solana,
            })
    }
}

#[async_trait]
impl WalletAdapter for SolanaAdapter {
    fn blockchain(&self) -> Blockchain {
        Blockchain::Solana
    }

    async fn connect(&self) -> Result<WalletInfo> {
        let provider = self.provider()?;

        let public_key = provider.connect().await?;
        if !is_valid_solana_address(&public_key) {
            return Err(MooniumError::Provider(format!(
                "invalid Solana public key: {public_key}"
            )));
        }

        tracing::debug!(wallet = %public_key, "solana wallet connected");
        Ok(WalletInfo::connected(
            Blockchain::Solana,
            &public_key,
            UNKNOWN_CLUSTER_ID,
        ))
    }

    async fn disconnect(&self) -> Result<WalletInfo> {
        let provider = self.provider()?;

        if !provider.is_connected() {
            return Err(MooniumError::NothingToDisconnect {
                blockchain: Blockchain::Solana,
            });
        }

        Ok(WalletInfo::Disconnected)
    }

    fn attach_listener(&self, patcher: WalletPatcher) -> ListenerHandle {
        let Some(provider) = self.provider.clone() else {
            return ListenerHandle::noop();
        };

        let handler: EventHandler = Arc::new(move |event: &ProviderEvent| {
            if let ProviderEvent::AccountsChanged(accounts) = event {
                match accounts.first() {
                    Some(public_key) => {
                        let id = MultichainAddress::new(Blockchain::Solana, public_key);
                        patcher(WalletPatch::Wallet(id.to_string()));
                    }
                    None => tracing::debug!("solana provider reported no account; keeping session"),
                }
            }
        });

        match provider.on(ProviderEventKind::AccountsChanged, handler) {
            Some(id) => ListenerHandle::new(move || provider.remove_listener(id)),
            None => ListenerHandle::noop(),
        }
    }
}
