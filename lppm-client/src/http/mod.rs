//! Transports
//!
//! A [`Transport`] turns an [`ApiRequest`] into a status code and a body.
//! Envelope decoding and token handling live one level up in
//! [`crate::api::ApiClient`], so every transport stays byte-oriented.

pub mod network;
#[cfg(feature = "in-process")]
pub mod oneshot;

pub use network::NetworkTransport;
#[cfg(feature = "in-process")]
pub use oneshot::OneshotTransport;

use async_trait::async_trait;
use http::{Method, StatusCode};
use serde_json::Value;

use crate::ClientResult;

/// A request against the LPPM API
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute API path, e.g. `/api/research/42`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Bearer token, attached as `Authorization: Bearer <token>`
    pub bearer: Option<String>,
    /// A 401 here means rejected credentials, not an expired session
    pub checks_credentials: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
            checks_credentials: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    pub fn checking_credentials(mut self) -> Self {
        self.checks_credentials = true;
        self
    }

    /// Path plus URL-encoded query string
    pub fn uri(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }

    pub fn auth_header(&self) -> Option<String> {
        self.bearer.as_ref().map(|t| format!("Bearer {}", t))
    }
}

/// Raw transport response
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Byte-level transport to the API
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> ClientResult<RawResponse>;
}
