/*
[INPUT]:  Moonium API schema definitions and serde requirements
[OUTPUT]: Typed Rust request bodies
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When request payloads change
*/

use serde::{Deserialize, Serialize};

/// Admin login credentials
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Partial user record for `POST /users` upserts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpsert {
    pub wallet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_request_uses_camel_case() {
        let body = serde_json::to_value(RefreshRequest {
            refresh_token: "r".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"refreshToken": "r"}));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("a@b.it", "Secret#123456");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("Secret"));
    }

    #[test]
    fn test_user_upsert_skips_unset_fields() {
        let body = serde_json::to_value(UserUpsert {
            wallet: "SOLANA:abc".to_string(),
            name: Some("Ada".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"wallet": "SOLANA:abc", "name": "Ada"}));
    }
}
