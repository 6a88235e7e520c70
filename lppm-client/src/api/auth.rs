//! `/api/auth` endpoints

use shared::client::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse,
};
use shared::models::{ProfileUpdate, User};

use super::ApiClient;
use crate::ClientResult;
use crate::http::ApiRequest;

/// Authentication API
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        let body = serde_json::to_value(request)?;
        self.client
            .send_data(
                ApiRequest::post("/api/auth/login")
                    .with_body(body)
                    .checking_credentials(),
            )
            .await
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.client.execute(ApiRequest::post("/api/auth/logout")).await
    }

    /// Current user for the attached token
    pub async fn me(&self) -> ClientResult<User> {
        self.client.get("/api/auth/me").await
    }

    pub async fn refresh(&self, refresh_token: &str) -> ClientResult<RefreshResponse> {
        let request = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.client.post("/api/auth/refresh", &request).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User> {
        self.client.put("/api/auth/profile", update).await
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> ClientResult<()> {
        let body = serde_json::to_value(request)?;
        self.client
            .execute(
                ApiRequest::post("/api/auth/change-password")
                    .with_body(body)
                    .checking_credentials(),
            )
            .await
    }
}
