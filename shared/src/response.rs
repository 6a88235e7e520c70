//! API Response types
//!
//! Every LPPM API response is wrapped in the same envelope:
//! ```json
//! {
//!     "success": true,
//!     "message": "Proposal created",
//!     "data": { ... }
//! }
//! ```
//! List endpoints return `data` as an array together with `pagination`.

use serde::{Deserialize, Serialize};

/// Fallback text when a failed envelope carries neither `error` nor `message`
pub const GENERIC_FAILURE: &str = "Request failed";

fn default_success() -> bool {
    true
}

/// Common view over the single-record and list envelopes
pub trait Envelope {
    /// Whether the server reported success
    fn is_success(&self) -> bool;

    /// `error`, then `message`, then [`GENERIC_FAILURE`]
    fn failure_message(&self) -> String;
}

/// Unified API response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// Create a successful response with a message
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            error: None,
        }
    }

    /// Create a failed response
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }

    /// Take the payload, if any
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl<T> Envelope for ApiResponse<T> {
    fn is_success(&self) -> bool {
        self.success
    }

    fn failure_message(&self) -> String {
        failure_message(self.error.as_deref(), self.message.as_deref())
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page number (1-based)
    pub page: u32,
    /// Items per page
    pub limit: u32,
    /// Total number of items
    pub total: u64,
    /// Total number of pages
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }

    /// Whether a page after the current one exists
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether a page before the current one exists
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, crate::request::DEFAULT_LIMIT, 0)
    }
}

/// List envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        Self {
            success: true,
            data,
            pagination: Some(Pagination::new(page, limit, total)),
            message: None,
            error: None,
        }
    }

    /// Pagination as sent by the server, or a single page built from `data`
    /// when the server omitted it
    pub fn pagination_or_single_page(&self) -> Pagination {
        self.pagination.unwrap_or_else(|| {
            let len = self.data.len() as u64;
            Pagination {
                page: 1,
                limit: u32::try_from(len).unwrap_or(u32::MAX),
                total: len,
                total_pages: u32::from(len > 0),
            }
        })
    }
}

impl<T> Envelope for PaginatedResponse<T> {
    fn is_success(&self) -> bool {
        self.success
    }

    fn failure_message(&self) -> String {
        failure_message(self.error.as_deref(), self.message.as_deref())
    }
}

fn failure_message(error: Option<&str>, message: Option<&str>) -> String {
    error
        .filter(|e| !e.trim().is_empty())
        .or(message.filter(|m| !m.trim().is_empty()))
        .unwrap_or(GENERIC_FAILURE)
        .to_string()
}
