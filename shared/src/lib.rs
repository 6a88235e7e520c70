//! Shared types for the LPPM client
//!
//! Wire types exchanged with the LPPM API: the response envelope,
//! pagination, list queries, auth DTOs and the entity models.

pub mod client;
pub mod models;
pub mod request;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use request::{ListQuery, SortOrder};
pub use response::{ApiResponse, Envelope, PaginatedResponse, Pagination};
