/*
[INPUT]:  Admin credentials or a refresh token
[OUTPUT]: Raw auth responses from the web service
[POS]:    HTTP layer - authentication endpoints
[UPDATE]: When auth endpoints or their status contract change
*/

use reqwest::{Method, StatusCode};

use crate::http::{MooniumClient, MooniumError, Result};
use crate::types::{AuthResponse, Credentials, RefreshRequest};

const LOGIN_ENDPOINT: &str = "/auth/login";
const REFRESH_ENDPOINT: &str = "/auth/refresh";

/// Status the web service answers with when a token pair is issued
pub const AUTH_SUCCESS_STATUS: StatusCode = StatusCode::CREATED;

impl MooniumClient {
    /// Post admin credentials.
    ///
    /// POST /auth/login
    ///
    /// Any status other than 201, or an unparsable body, is `AuthFailed`;
    /// transport failures stay `Http`.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let builder = self.request(Method::POST, LOGIN_ENDPOINT)?.json(credentials);
        self.send_auth(builder, MooniumError::AuthFailed).await
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// POST /auth/refresh
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse> {
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let builder = self.request(Method::POST, REFRESH_ENDPOINT)?.json(&body);
        self.send_auth(builder, MooniumError::TokenExpired).await
    }

    async fn send_auth(
        &self,
        builder: reqwest::RequestBuilder,
        rejection: MooniumError,
    ) -> Result<AuthResponse> {
        let (status, body) = self.send_raw(builder).await?;
        if status != AUTH_SUCCESS_STATUS {
            tracing::debug!(status = %status, "auth endpoint rejected request");
            return Err(rejection);
        }
        serde_json::from_str(&body).map_err(|err| {
            tracing::debug!(error = %err, "auth endpoint returned malformed body");
            rejection
        })
    }
}
