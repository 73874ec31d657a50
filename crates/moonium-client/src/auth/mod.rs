/*
[INPUT]:  Admin credentials and persisted refresh tokens
[OUTPUT]: Admin session state and token lifecycle
[POS]:    Auth layer - admin authentication for the Moonium web service
[UPDATE]: When the auth flow or token storage changes
*/

pub mod manager;
pub mod tokens;

pub use manager::{AuthManager, AuthPhase, AuthState};
pub use tokens::{TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
