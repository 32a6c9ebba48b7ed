//! Shared HTTP plumbing for the provider client.

use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::GatewayError;

/// Configuration for the underlying HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
        }
    }
}

/// Thin JSON wrapper around `reqwest`.
///
/// Every request is submitted exactly once; transport and API failures
/// surface to the caller unretried.
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: &HttpClientConfig, user_agent: Option<&str>) -> Result<Self, GatewayError> {
        let default_ua = format!("promptgate/{}", env!("CARGO_PKG_VERSION"));
        let ua = user_agent.unwrap_or(&default_ua);

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(ua)
            .build()
            .map_err(|e| {
                GatewayError::Configuration(format!("Failed to build reqwest client: {e}"))
            })?;

        Ok(Self { client })
    }

    /// Make a POST request with a JSON body and decode a JSON response.
    #[tracing::instrument(
        name = "http_post_json",
        skip(self, headers, body),
        fields(url = %url),
        err
    )]
    pub async fn post_json<Req, Res>(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Req,
    ) -> Result<Res, GatewayError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let mut req_builder = self.client.post(url).json(body);
        for (name, value) in headers {
            req_builder = req_builder.header(name, value);
        }

        let res = req_builder
            .send()
            .await
            .map_err(|e| GatewayError::Network {
                message: "Request failed".to_string(),
                source: Box::new(e),
            })?;

        Self::decode(res).await
    }

    /// Make a GET request and decode a JSON response.
    #[tracing::instrument(
        name = "http_get_json",
        skip(self, headers),
        fields(url = %url),
        err
    )]
    pub async fn get_json<Res>(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<Res, GatewayError>
    where
        Res: DeserializeOwned,
    {
        let mut req_builder = self.client.get(url);
        for (name, value) in headers {
            req_builder = req_builder.header(name, value);
        }

        let res = req_builder
            .send()
            .await
            .map_err(|e| GatewayError::Network {
                message: "Request failed".to_string(),
                source: Box::new(e),
            })?;

        Self::decode(res).await
    }

    async fn decode<Res: DeserializeOwned>(res: reqwest::Response) -> Result<Res, GatewayError> {
        let status = res.status();

        if !status.is_success() {
            let error_text = res
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GatewayError::Api {
                message: error_text,
                status_code: status.as_u16(),
            });
        }

        debug!(status = %status, "HTTP request successful");

        let response_text = res.text().await.map_err(|e| GatewayError::Parse {
            message: "Failed to read response body".to_string(),
            source: Some(Box::new(e)),
        })?;

        serde_json::from_str(&response_text).map_err(|e| GatewayError::Parse {
            message: "Failed to parse API response".to_string(),
            source: Some(Box::new(e)),
        })
    }
}
