// lppm-client/src/http/oneshot.rs
// Oneshot transport - in-process dispatch into an axum Router
//
// Requires the "in-process" feature

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::Request;
use tower::ServiceExt;

use super::{ApiRequest, RawResponse, Transport};
use crate::{ClientError, ClientResult};

/// Oneshot transport (in-memory calls)
///
/// Calls the Router directly through tower's `oneshot`, with no network in
/// between. Tests use it to stand up a stub of the LPPM API.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get};
/// use lppm_client::http::OneshotTransport;
///
/// let router = Router::new().route("/api/auth/me", get(me_handler));
/// let transport = OneshotTransport::new(router);
/// ```
#[derive(Debug, Clone)]
pub struct OneshotTransport {
    router: Router,
}

impl OneshotTransport {
    /// `router` must already have its state applied
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    fn build_request(request: &ApiRequest) -> ClientResult<Request<Body>> {
        let mut builder = Request::builder()
            .method(request.method.clone())
            .uri(request.uri());

        if let Some(auth) = request.auth_header() {
            builder = builder.header(http::header::AUTHORIZATION, auth);
        }

        let body = match &request.body {
            Some(value) => {
                builder = builder.header(http::header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(value)?)
            }
            None => Body::empty(),
        };

        builder
            .body(body)
            .map_err(|e| ClientError::Internal(format!("Failed to build request: {}", e)))
    }
}

#[async_trait]
impl Transport for OneshotTransport {
    async fn execute(&self, request: ApiRequest) -> ClientResult<RawResponse> {
        let http_request = Self::build_request(&request)?;

        let response = self
            .router
            .clone()
            .oneshot(http_request)
            .await
            .map_err(|e| ClientError::Internal(format!("Oneshot call failed: {}", e)))?;

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Internal(format!("Failed to read body: {}", e)))?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}
