/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client ready for Moonium API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::http::{MooniumError, Result};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the Moonium web service
#[derive(Debug, Clone)]
pub struct MooniumClient {
    http_client: Client,
    base_url: Url,
}

impl MooniumClient {
    /// Create a new client for the given API base URL with default configuration
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::default(), base_url)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for an endpoint, keeping any path prefix of the base URL
    pub(crate) fn url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    /// Build full URL from path segments; each segment is percent-encoded
    pub(crate) fn segment_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MooniumError::Config("API base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build request builder for a path made of caller-supplied segments
    pub(crate) fn segment_request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.segment_url(segments)?;
        Ok(self.http_client.request(method, url))
    }

    /// Build request builder for an endpoint
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.url(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Build request builder carrying an optional bearer token
    pub(crate) fn authorized_request(
        &self,
        method: Method,
        endpoint: &str,
        access_token: Option<&str>,
    ) -> Result<RequestBuilder> {
        let builder = self.request(method, endpoint)?;
        Ok(match access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Send a request and decode the JSON body of any 2xx response
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send a request and return the raw status plus body text
    pub(crate) async fn send_raw(&self, builder: RequestBuilder) -> Result<(StatusCode, String)> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = %status, body = %body, "moonium API call failed");
    Err(MooniumError::api_error(status, body))
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    if base_url.trim().is_empty() {
        return Err(MooniumError::Config("API base URL is empty".to_string()));
    }
    let mut url = Url::parse(base_url.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
