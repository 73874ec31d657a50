/*
[INPUT]:  Adapter results, provider events, persisted wallet-info blobs
[OUTPUT]: Connected/Disconnected wallet state and multichain identifiers
[POS]:    Wallet layer - state representation shared by adapters and session
[UPDATE]: When the persisted blob format or explorer hosts change
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::http::{MooniumError, Result};
use crate::types::Blockchain;

/// A fully populated wallet connection.
///
/// Serialized as the `wallet-info` blob: `{"wallet","chainId","blockchain"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedWallet {
    /// Multichain identifier, `<CHAIN>:<address>`
    pub wallet: String,
    pub chain_id: String,
    pub blockchain: Blockchain,
}

impl ConnectedWallet {
    pub fn address(&self) -> &str {
        self.wallet
            .split_once(':')
            .map(|(_, address)| address)
            .unwrap_or(&self.wallet)
    }

    /// Block explorer page for the connected address, when the network is known
    pub fn explorer_url(&self) -> Option<String> {
        let address = self.address();
        match self.blockchain {
            Blockchain::Ethereum => {
                let host = match self.chain_id.to_ascii_lowercase().as_str() {
                    "0x1" => "etherscan.io",
                    "0x4" => "rinkeby.etherscan.io",
                    "0x5" => "goerli.etherscan.io",
                    "0x89" => "polygonscan.com",
                    "0x13881" => "mumbai.polygonscan.com",
                    _ => return None,
                };
                Some(format!("https://{host}/address/{address}"))
            }
            Blockchain::Solana => Some(format!("https://explorer.solana.com/address/{address}")),
        }
    }
}

/// Wallet session state: every field present, or none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WalletInfo {
    #[default]
    Disconnected,
    Connected(ConnectedWallet),
}

impl WalletInfo {
    /// Build a connected state, prefixing the raw address with the chain tag.
    pub fn connected(blockchain: Blockchain, address: &str, chain_id: impl Into<String>) -> Self {
        WalletInfo::Connected(ConnectedWallet {
            wallet: MultichainAddress::new(blockchain, address).to_string(),
            chain_id: chain_id.into(),
            blockchain,
        })
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, WalletInfo::Connected(_))
    }

    pub fn as_connected(&self) -> Option<&ConnectedWallet> {
        match self {
            WalletInfo::Connected(wallet) => Some(wallet),
            WalletInfo::Disconnected => None,
        }
    }

    pub fn wallet(&self) -> Option<&str> {
        self.as_connected().map(|w| w.wallet.as_str())
    }

    pub fn chain_id(&self) -> Option<&str> {
        self.as_connected().map(|w| w.chain_id.as_str())
    }

    pub fn blockchain(&self) -> Option<Blockchain> {
        self.as_connected().map(|w| w.blockchain)
    }

    /// Apply a provider-originated patch, preserving the other fields.
    ///
    /// Returns `false` (and leaves the state alone) when disconnected or when
    /// the patch changes nothing.
    pub fn apply(&mut self, patch: WalletPatch) -> bool {
        let WalletInfo::Connected(wallet) = self else {
            return false;
        };
        let field = match patch {
            WalletPatch::ChainId(chain_id) => (&mut wallet.chain_id, chain_id),
            WalletPatch::Wallet(id) => (&mut wallet.wallet, id),
        };
        if *field.0 == field.1 {
            return false;
        }
        *field.0 = field.1;
        true
    }

    /// JSON blob to persist; `None` for the disconnected state.
    pub fn to_persisted(&self) -> Result<Option<String>> {
        match self {
            WalletInfo::Connected(wallet) => Ok(Some(serde_json::to_string(wallet)?)),
            WalletInfo::Disconnected => Ok(None),
        }
    }

    /// Parse a persisted blob; partial or inconsistent blobs are rejected.
    pub fn from_persisted(blob: &str) -> Result<Self> {
        let wallet: ConnectedWallet = serde_json::from_str(blob)?;
        let address: MultichainAddress = wallet.wallet.parse()?;
        if address.blockchain != wallet.blockchain || wallet.chain_id.is_empty() {
            return Err(MooniumError::Storage(format!(
                "inconsistent wallet-info blob for {}",
                wallet.wallet
            )));
        }
        Ok(WalletInfo::Connected(wallet))
    }
}

/// Partial update emitted by a provider listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletPatch {
    ChainId(String),
    /// Already chain-prefixed identifier
    Wallet(String),
}

/// `<CHAIN>:<address>` identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MultichainAddress {
    pub blockchain: Blockchain,
    pub address: String,
}

impl MultichainAddress {
    pub fn new(blockchain: Blockchain, address: &str) -> Self {
        Self {
            blockchain,
            address: address.to_string(),
        }
    }
}

impl fmt::Display for MultichainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.blockchain, self.address)
    }
}

impl FromStr for MultichainAddress {
    type Err = MooniumError;

    fn from_str(s: &str) -> Result<Self> {
        let (chain, address) = s
            .split_once(':')
            .ok_or_else(|| MooniumError::Provider(format!("missing chain prefix in {s}")))?;
        let blockchain = chain.parse::<Blockchain>().map_err(MooniumError::Provider)?;
        if address.is_empty() {
            return Err(MooniumError::Provider(format!("empty address in {s}")));
        }
        Ok(Self::new(blockchain, address))
    }
}

/// `0x` followed by 20 hex-encoded bytes
pub fn is_valid_ethereum_address(address: &str) -> bool {
    address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .filter(|hex_part| hex_part.len() == 40)
        .is_some_and(|hex_part| hex::decode(hex_part).is_ok())
}

/// Base58 string decoding to a 32-byte ed25519 public key
pub fn is_valid_solana_address(address: &str) -> bool {
    bs58::decode(address)
        .into_vec()
        .is_ok_and(|bytes| bytes.len() == 32)
}
