//! Auth API DTOs
//!
//! Request/response bodies of the `/api/auth` endpoints.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::User;

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Refresh request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh response data; the server may rotate the refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Change password request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_password_change"))]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
}

fn validate_password_change(req: &ChangePasswordRequest) -> Result<(), ValidationError> {
    if req.current_password == req.new_password {
        return Err(ValidationError::new("password_unchanged")
            .with_message("New password must differ from the current one".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_validation() {
        assert!(LoginRequest::new("dosen@univ.ac.id", "secret").validate().is_ok());
        assert!(LoginRequest::new("not-an-email", "secret").validate().is_err());
        assert!(LoginRequest::new("dosen@univ.ac.id", "").validate().is_err());
    }

    #[test]
    fn test_change_password_validation() {
        let same = ChangePasswordRequest {
            current_password: "password123".into(),
            new_password: "password123".into(),
        };
        assert!(same.validate().is_err());

        let short = ChangePasswordRequest {
            current_password: "password123".into(),
            new_password: "short".into(),
        };
        assert!(short.validate().is_err());

        let ok = ChangePasswordRequest {
            current_password: "password123".into(),
            new_password: "another-password".into(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_login_response_wire_format() {
        let json = serde_json::json!({
            "user": {
                "id": "u1",
                "name": "Dr. Sari",
                "email": "sari@univ.ac.id",
                "role": "dosen"
            },
            "token": "access",
            "refreshToken": "refresh"
        });
        let resp: LoginResponse = serde_json::from_value(json).unwrap();
        assert_eq!(resp.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(resp.user.id, "u1");
    }
}
