// lppm-client/src/http/network.rs
// Network transport - reqwest

use async_trait::async_trait;
use reqwest::Client;

use super::{ApiRequest, RawResponse, Transport};
use crate::{ClientConfig, ClientError, ClientResult};

/// Network HTTP transport
#[derive(Debug, Clone)]
pub struct NetworkTransport {
    client: Client,
    base_url: String,
}

impl NetworkTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_duration() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for NetworkTransport {
    async fn execute(&self, request: ApiRequest) -> ClientResult<RawResponse> {
        let url = format!("{}{}", self.base_url, request.uri());
        let mut req = self.client.request(request.method.clone(), &url);
        if let Some(auth) = request.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        tracing::debug!(method = %request.method, path = %request.path, "API request");
        let response = req.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse { status, body })
    }
}
