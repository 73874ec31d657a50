/*
[INPUT]:  Moonium API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs for admins, projects, contracts, NFTs and users
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new resources are consumed
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated project administrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,
}

/// Theme customization carried by a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEnv {
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub color: String,
}

/// A client project/environment hosted on Moonium
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<ProjectEnv>,
    #[serde(default)]
    pub admins: Vec<Admin>,
    #[serde(default)]
    pub contracts: Vec<Contract>,
}

impl Project {
    /// Multichain addresses of every contract attached to the project.
    pub fn contract_addresses(&self) -> Vec<String> {
        self.contracts.iter().map(|c| c.address.clone()).collect()
    }

    pub fn theme_color(&self) -> &str {
        self.env
            .as_ref()
            .map(|env| env.color.as_str())
            .filter(|color| !color.is_empty())
            .unwrap_or(DEFAULT_THEME_COLOR)
    }
}

pub const DEFAULT_THEME_COLOR: &str = "#fbc88c";

/// Blockchain-independent smart contract description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub name: String,
    pub symbol: String,
    /// Multichain address (`<CHAIN>:<address>`)
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi: Option<String>,
    #[serde(default)]
    pub nft: Vec<Nft>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftAttribute {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nft {
    pub name: String,
    #[serde(default = "default_supply")]
    pub supply: u64,
    /// Multichain contract address + token id
    pub token_id: String,
    #[serde(default)]
    pub asset_url: String,
    #[serde(default)]
    pub metadata: Vec<NftAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Box<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<Box<Contract>>,
}

fn default_supply() -> u64 {
    1
}

/// A registered end user, identified by its multichain wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub wallet: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub nft: Vec<Nft>,
}
