//! API client
//!
//! [`ApiClient`] owns the shared bearer-token slot and turns raw transport
//! responses into envelopes. Endpoint groups build on it:
//! [`AuthApi`] for `/api/auth` and [`ResourceApi`] for the entity collections.

pub mod auth;
pub mod resource;

pub use auth::AuthApi;
pub use resource::{ProposalResource, Resource, ResourceApi};

use std::sync::Arc;

use http::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::response::{ApiResponse, Envelope};
use tokio::sync::{RwLock, broadcast};

use crate::http::{ApiRequest, NetworkTransport, RawResponse, Transport};
use crate::{ClientConfig, ClientError, ClientResult};

/// Session-level events raised by the API client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// The server rejected the bearer token
    Unauthorized,
}

/// Envelope-aware API client
///
/// Clones share the transport, the token slot and the event channel, so a
/// login through one clone authenticates every store built from the others.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    token: Arc<RwLock<Option<String>>>,
    events: broadcast::Sender<AuthEvent>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(transport: impl Transport + 'static) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            transport: Arc::new(transport),
            token: Arc::new(RwLock::new(None)),
            events,
        }
    }

    /// Network client from configuration
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(NetworkTransport::new(config)?))
    }

    /// In-process client over an axum Router
    #[cfg(feature = "in-process")]
    pub fn in_process(router: axum::Router) -> Self {
        Self::new(crate::http::OneshotTransport::new(router))
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Send a request and decode the envelope `E`
    pub async fn send<E>(&self, request: ApiRequest) -> ClientResult<E>
    where
        E: DeserializeOwned + Envelope,
    {
        let (request, response) = self.dispatch(request).await?;
        decode(&request, response)
    }

    /// Attach the bearer, run the transport and handle a rejected token
    async fn dispatch(&self, request: ApiRequest) -> ClientResult<(ApiRequest, RawResponse)> {
        let request = request.with_bearer(self.token().await);
        let response = self
            .transport
            .execute(request.clone())
            .await
            .inspect_err(|e| {
                tracing::warn!(method = %request.method, path = %request.path, error = %e, "API request failed");
            })?;

        if response.status == StatusCode::UNAUTHORIZED {
            let message = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&response.body)
                .map(|env| env.failure_message())
                .unwrap_or_else(|_| "Session expired, please log in again".to_string());
            // Only a bearer the server refused ends the session
            if request.bearer.is_some() && !request.checks_credentials {
                tracing::warn!(method = %request.method, path = %request.path, "Token rejected by server");
                self.set_token(None).await;
                // No receivers is fine
                let _ = self.events.send(AuthEvent::Unauthorized);
            } else {
                tracing::debug!(method = %request.method, path = %request.path, %message, "Credentials rejected");
            }
            return Err(ClientError::Unauthorized(message));
        }

        Ok((request, response))
    }

    /// Send and unwrap `data`
    pub async fn send_data<T>(&self, request: ApiRequest) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        self.send::<ApiResponse<T>>(request)
            .await?
            .into_data()
            .ok_or_else(|| ClientError::InvalidResponse("Missing data".into()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send_data(ApiRequest::get(path)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_data(ApiRequest::post(path).with_body(serde_json::to_value(body)?))
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_data(ApiRequest::put(path).with_body(serde_json::to_value(body)?))
            .await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_data(ApiRequest::patch(path).with_body(serde_json::to_value(body)?))
            .await
    }

    /// Send a request whose envelope carries no data worth keeping
    ///
    /// A successful status with an empty body (e.g. `204 No Content`) counts
    /// as success.
    pub async fn execute(&self, request: ApiRequest) -> ClientResult<()> {
        let (request, response) = self.dispatch(request).await?;
        if response.status.is_success() && response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }
        decode::<ApiResponse<serde_json::Value>>(&request, response)?;
        Ok(())
    }
}

fn decode<E>(request: &ApiRequest, response: RawResponse) -> ClientResult<E>
where
    E: DeserializeOwned + Envelope,
{
    let envelope = match serde_json::from_slice::<E>(&response.body) {
        Ok(envelope) => envelope,
        Err(e) if response.status.is_success() => {
            return Err(ClientError::InvalidResponse(format!("JSON parse error: {}", e)));
        }
        Err(_) => return Err(ClientError::from_status(response.status, response.text())),
    };

    if !envelope.is_success() {
        let message = envelope.failure_message();
        tracing::debug!(method = %request.method, path = %request.path, status = %response.status, %message, "API returned failure");
        return Err(match response.status {
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            status => ClientError::Api { status, message },
        });
    }

    if !response.status.is_success() {
        return Err(ClientError::from_status(response.status, response.text()));
    }

    Ok(envelope)
}
