/*
[INPUT]:  Moonium API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions shared by wallet and HTTP layers
[UPDATE]: When a blockchain is added or the API enum values change
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Blockchains supported by Moonium.
///
/// The serialized form doubles as the prefix of multichain identifiers
/// (`ETHEREUM:0x..`, `SOLANA:<pubkey>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Blockchain {
    Ethereum,
    Solana,
}

impl Blockchain {
    pub const ALL: [Blockchain; 2] = [Blockchain::Ethereum, Blockchain::Solana];

    pub fn as_str(&self) -> &'static str {
        match self {
            Blockchain::Ethereum => "ETHEREUM",
            Blockchain::Solana => "SOLANA",
        }
    }
}

impl fmt::Display for Blockchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Blockchain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ETHEREUM" | "ETH" => Ok(Blockchain::Ethereum),
            "SOLANA" | "SOL" => Ok(Blockchain::Solana),
            other => Err(format!("unsupported blockchain: {other}")),
        }
    }
}

/// Sort direction accepted by the CRUD query endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}
