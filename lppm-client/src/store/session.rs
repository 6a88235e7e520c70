//! Session store
//!
//! Holds the signed-in user and both tokens, mirrors them into [`Storage`]
//! and keeps the [`ApiClient`] bearer slot in sync. Every verification
//! failure fails closed: the local session is dropped.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::client::{ChangePasswordRequest, LoginRequest};
use shared::models::{ProfileUpdate, Role, User};
use tokio::sync::RwLock;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use validator::Validate;

use crate::api::{ApiClient, AuthApi, AuthEvent};
use crate::notify::NoticeBus;
use crate::storage::{AUTH_TOKEN_KEY, REFRESH_TOKEN_KEY, SESSION_SNAPSHOT_KEY, Storage};
use crate::{ClientError, ClientResult};

/// Observable session state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.is_authenticated && self.role() == Some(role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.is_authenticated && self.role().is_some_and(|r| roles.contains(&r))
    }
}

/// Persisted part of the session; tokens live under their own keys
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionSnapshot {
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    is_authenticated: bool,
}

/// Session store handle; clones share state
#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
    auth: AuthApi,
    storage: Arc<dyn Storage>,
    notices: NoticeBus,
    state: Arc<RwLock<SessionState>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Restore the persisted session without contacting the server
    pub async fn new(api: ApiClient, storage: Arc<dyn Storage>, notices: NoticeBus) -> Self {
        let token = storage.get(AUTH_TOKEN_KEY);
        let refresh_token = storage.get(REFRESH_TOKEN_KEY);
        let snapshot = storage
            .get(SESSION_SNAPSHOT_KEY)
            .and_then(|raw| match serde_json::from_str::<SessionSnapshot>(&raw) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable session snapshot");
                    None
                }
            })
            .unwrap_or_default();

        let state = SessionState {
            is_authenticated: token.is_some() && snapshot.is_authenticated,
            user: snapshot.user,
            token: token.clone(),
            refresh_token,
            is_loading: false,
            error: None,
        };
        tracing::debug!(
            has_token = state.token.is_some(),
            authenticated = state.is_authenticated,
            "Session restored from storage"
        );

        api.set_token(token).await;

        Self {
            auth: AuthApi::new(api.clone()),
            api,
            storage,
            notices,
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated
    }

    pub async fn has_role(&self, role: Role) -> bool {
        self.state.read().await.has_role(role)
    }

    pub async fn has_any_role(&self, roles: &[Role]) -> bool {
        self.state.read().await.has_any_role(roles)
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    /// Sign in and persist the session
    pub async fn login(&self, request: LoginRequest) -> ClientResult<User> {
        if let Err(errors) = request.validate() {
            let err = ClientError::from(errors);
            self.fail(&err).await;
            return Err(err);
        }

        self.begin().await;
        tracing::info!(email = %request.email, "Logging in");

        match self.auth.login(&request).await {
            Ok(response) => {
                self.api.set_token(Some(response.token.clone())).await;
                {
                    let mut state = self.state.write().await;
                    state.user = Some(response.user.clone());
                    state.token = Some(response.token);
                    state.refresh_token = response.refresh_token;
                    state.is_authenticated = true;
                    state.is_loading = false;
                    state.error = None;
                    self.persist(&state);
                }
                tracing::info!(user_id = %response.user.id, role = %response.user.role, "Login successful");
                self.notices
                    .success(format!("Welcome, {}", response.user.name));
                Ok(response.user)
            }
            Err(e) => {
                self.fail(&e).await;
                Err(e)
            }
        }
    }

    /// Notify the server (best effort), then drop the local session
    pub async fn logout(&self) {
        let has_token = self.state.read().await.token.is_some();
        if has_token && let Err(e) = self.auth.logout().await {
            tracing::warn!(error = %e, "Server logout failed, clearing local session anyway");
        }
        self.clear_local().await;
        self.notices.info("Logged out");
    }

    /// Verify the stored token with the server
    ///
    /// Without a token no request is made. Any failure drops the session.
    pub async fn check_auth(&self) -> bool {
        if self.state.read().await.token.is_none() {
            self.state.write().await.is_authenticated = false;
            return false;
        }

        self.begin().await;
        match self.auth.me().await {
            Ok(user) => {
                let mut state = self.state.write().await;
                state.user = Some(user);
                state.is_authenticated = true;
                state.is_loading = false;
                self.persist(&state);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token verification failed, logging out");
                self.clear_local().await;
                false
            }
        }
    }

    /// Exchange the refresh token for a new access token
    ///
    /// Only runs when called; failure drops the session.
    pub async fn refresh_token(&self) -> ClientResult<()> {
        let stored = self.state.read().await.refresh_token.clone();
        let Some(refresh_token) = stored else {
            self.clear_local().await;
            return Err(ClientError::NotAuthenticated);
        };

        match self.auth.refresh(&refresh_token).await {
            Ok(response) => {
                self.api.set_token(Some(response.token.clone())).await;
                let mut state = self.state.write().await;
                state.token = Some(response.token);
                if let Some(rotated) = response.refresh_token {
                    state.refresh_token = Some(rotated);
                }
                self.persist(&state);
                tracing::debug!("Access token refreshed");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, logging out");
                self.clear_local().await;
                Err(e)
            }
        }
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> ClientResult<User> {
        if let Err(errors) = update.validate() {
            let err = ClientError::from(errors);
            self.fail(&err).await;
            return Err(err);
        }
        self.require_session().await?;

        self.begin().await;
        match self.auth.update_profile(&update).await {
            Ok(user) => {
                {
                    let mut state = self.state.write().await;
                    state.user = Some(user.clone());
                    state.is_loading = false;
                    self.persist(&state);
                }
                self.notices.success("Profile updated");
                Ok(user)
            }
            Err(e) => {
                self.fail(&e).await;
                Err(e)
            }
        }
    }

    pub async fn change_password(&self, request: ChangePasswordRequest) -> ClientResult<()> {
        if let Err(errors) = request.validate() {
            let err = ClientError::from(errors);
            self.fail(&err).await;
            return Err(err);
        }
        self.require_session().await?;

        self.begin().await;
        match self.auth.change_password(&request).await {
            Ok(()) => {
                self.state.write().await.is_loading = false;
                self.notices.success("Password changed");
                Ok(())
            }
            Err(e) => {
                self.fail(&e).await;
                Err(e)
            }
        }
    }

    /// Drop the local session whenever the API client reports a rejected token
    pub fn spawn_auth_listener(&self) -> JoinHandle<()> {
        let mut events = self.api.subscribe();
        let store = self.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(AuthEvent::Unauthorized) => store.on_unauthorized().await,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Auth listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    async fn on_unauthorized(&self) {
        let active = {
            let state = self.state.read().await;
            state.is_authenticated || state.token.is_some()
        };
        if active {
            tracing::info!("Session rejected by server, logging out");
            self.clear_local().await;
            self.notices.warning("Session expired, please log in again");
        }
    }

    async fn require_session(&self) -> ClientResult<()> {
        if self.state.read().await.is_authenticated {
            Ok(())
        } else {
            let err = ClientError::NotAuthenticated;
            self.fail(&err).await;
            Err(err)
        }
    }

    async fn begin(&self) {
        let mut state = self.state.write().await;
        state.is_loading = true;
        state.error = None;
    }

    async fn fail(&self, error: &ClientError) {
        let message = error.to_string();
        {
            let mut state = self.state.write().await;
            state.is_loading = false;
            state.error = Some(message.clone());
        }
        self.notices.error(message);
    }

    async fn clear_local(&self) {
        self.api.set_token(None).await;
        *self.state.write().await = SessionState::default();
        for key in [AUTH_TOKEN_KEY, REFRESH_TOKEN_KEY, SESSION_SNAPSHOT_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "Failed to clear stored session");
            }
        }
    }

    fn persist(&self, state: &SessionState) {
        let snapshot = SessionSnapshot {
            user: state.user.clone(),
            is_authenticated: state.is_authenticated,
        };
        let result = store_optional(self.storage.as_ref(), AUTH_TOKEN_KEY, state.token.as_deref())
            .and_then(|()| {
                store_optional(
                    self.storage.as_ref(),
                    REFRESH_TOKEN_KEY,
                    state.refresh_token.as_deref(),
                )
            })
            .and_then(|()| {
                let json = serde_json::to_string(&snapshot)?;
                self.storage.set(SESSION_SNAPSHOT_KEY, &json)
            });
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist session");
        }
    }
}

fn store_optional(
    storage: &dyn Storage,
    key: &str,
    value: Option<&str>,
) -> Result<(), crate::storage::StorageError> {
    match value {
        Some(value) => storage.set(key, value),
        None => storage.remove(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        serde_json::from_value(serde_json::json!({
            "id": "u1",
            "name": "Siti",
            "email": "siti@univ.ac.id",
            "role": role,
        }))
        .unwrap()
    }

    #[test]
    fn test_role_checks_require_authentication() {
        let mut state = SessionState {
            user: Some(user(Role::Reviewer)),
            ..Default::default()
        };
        assert!(!state.has_role(Role::Reviewer));

        state.is_authenticated = true;
        assert!(state.has_role(Role::Reviewer));
        assert!(state.has_any_role(&[Role::Admin, Role::Reviewer]));
        assert!(!state.has_any_role(&[Role::Dosen]));
    }
}
