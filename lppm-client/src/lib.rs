//! LPPM client
//!
//! Typed client for the LPPM research and community-service API, with the
//! client-side stores a front end builds on:
//!
//! - [`api`]: envelope-aware API client and endpoint groups
//! - [`store`]: session store and generic remote collection cache
//! - [`routes`]: role-gated navigation
//! - [`notify`]: transient notifications
//! - [`storage`]: persistent key/value storage for tokens and session
//!
//! # Example
//!
//! ```ignore
//! use lppm_client::{ApiClient, ClientConfig, store::Stores, storage::FileStorage};
//! use shared::client::LoginRequest;
//! use std::sync::Arc;
//!
//! let config = ClientConfig::from_env();
//! let api = ApiClient::from_config(&config)?;
//! let storage = Arc::new(FileStorage::open(&config.storage_path));
//! let stores = Stores::new(api, storage, config.page_size).await;
//!
//! stores.session.login(LoginRequest::new("dosen@univ.ac.id", "secret")).await?;
//! stores.research.set_filter("status", "submitted").await?;
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod notify;
pub mod routes;
pub mod storage;
pub mod store;

pub use api::{ApiClient, AuthApi, AuthEvent, ResourceApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ErrorKind};

// Re-export shared types for convenience
pub use shared::client::{ChangePasswordRequest, LoginRequest, LoginResponse};
pub use shared::models::{ProposalStatus, Role, User};
