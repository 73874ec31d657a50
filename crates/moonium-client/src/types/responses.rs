/*
[INPUT]:  Moonium API schema definitions and serde requirements
[OUTPUT]: Typed Rust response bodies
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When response payloads change
*/

use serde::{Deserialize, Serialize};

use super::models::Admin;

/// Body returned by `/auth/login` and `/auth/refresh`.
///
/// Every field is optional on the wire; [`AuthResponse::into_session`] enforces
/// the all-or-nothing contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub payload: Option<Admin>,
}

/// A complete authenticated session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub admin: Admin,
}

impl AuthResponse {
    /// Returns a session only when both tokens are non-empty and the identity is present.
    pub fn into_session(self) -> Option<Session> {
        let access_token = self.access.filter(|t| !t.is_empty())?;
        let refresh_token = self.refresh.filter(|t| !t.is_empty())?;
        let admin = self.payload?;
        Some(Session {
            access_token,
            refresh_token,
            admin,
        })
    }
}
