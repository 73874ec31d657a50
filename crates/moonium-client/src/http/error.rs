/*
[INPUT]:  Error sources (HTTP, API, wallet providers, storage, serialization)
[OUTPUT]: Structured error types with translation keys
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or translation keys
*/

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::Blockchain;

/// Main error type for the Moonium client
#[derive(Error, Debug)]
pub enum MooniumError {
    /// The injected wallet provider for a chain is absent or misidentified
    #[error("{blockchain} wallet provider not found")]
    ProviderMissing { blockchain: Blockchain },

    /// Disconnect requested but the provider reports no connected account
    #[error("no connected {blockchain} account to disconnect")]
    NothingToDisconnect { blockchain: Blockchain },

    /// No adapter registered for the requested chain
    #[error("unsupported blockchain: {0}")]
    UnsupportedBlockchain(Blockchain),

    /// The provider rejected or failed a request (user denial, bad payload)
    #[error("wallet provider error: {0}")]
    Provider(String),

    /// Login rejected or answered with an incomplete body
    #[error("authentication failed")]
    AuthFailed,

    /// No refresh token available, or the refresh was rejected
    #[error("session expired, please log in again")]
    TokenExpired,

    /// A newer auth operation started before this response arrived
    #[error("auth response discarded: a newer operation is in progress")]
    Superseded,

    /// Requested resource does not exist
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Any other non-success API response
    #[error("API call failed (status {status}): {message}")]
    ApiCallFailed { status: u16, message: String },

    /// HTTP transport failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Durable storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MooniumError {
    /// Translation key used when the error is shown to the user.
    ///
    /// Anything without a dedicated message resolves to `errors.api_call_failed`.
    pub fn translation_key(&self) -> &'static str {
        match self {
            MooniumError::ProviderMissing {
                blockchain: Blockchain::Ethereum,
            } => "errors.no_metamask",
            MooniumError::ProviderMissing {
                blockchain: Blockchain::Solana,
            } => "errors.no_phantom",
            MooniumError::NothingToDisconnect { .. } => "errors.cant_disconnect",
            MooniumError::UnsupportedBlockchain(_) => "errors.unsupported_blockchain",
            MooniumError::AuthFailed => "errors.auth_failed",
            MooniumError::TokenExpired => "errors.token_expired",
            MooniumError::NotFound(_) => "errors.not_found",
            _ => "errors.api_call_failed",
        }
    }

    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(self, MooniumError::AuthFailed | MooniumError::TokenExpired)
    }

    /// Check if error originates from a wallet adapter
    pub fn is_wallet_error(&self) -> bool {
        matches!(
            self,
            MooniumError::ProviderMissing { .. }
                | MooniumError::NothingToDisconnect { .. }
                | MooniumError::UnsupportedBlockchain(_)
                | MooniumError::Provider(_)
        )
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        MooniumError::ApiCallFailed {
            status: status.as_u16(),
            message: message.into(),
        }
    }
}

/// Result type alias for Moonium operations
pub type Result<T> = std::result::Result<T, MooniumError>;
