// lppm-client/tests/common/mod.rs
// Stub LPPM API pieces shared by the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lppm_client::ApiClient;
use serde_json::{Value, json};

/// Request counter shared with a stub handler
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Last value seen by a stub handler (query string, header, body)
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<String>>>);

impl Captured {
    pub fn push(&self, value: impl Into<String>) {
        self.0.lock().unwrap().push(value.into());
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.0.lock().unwrap().last().cloned()
    }
}

pub fn client(router: axum::Router) -> ApiClient {
    ApiClient::in_process(router)
}

pub fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

pub fn ok_list(data: Value, page: u32, limit: u32, total: u64) -> Response {
    let total_pages = total.div_ceil(u64::from(limit.max(1)));
    Json(json!({
        "success": true,
        "data": data,
        "pagination": { "page": page, "limit": limit, "total": total, "totalPages": total_pages }
    }))
    .into_response()
}

pub fn fail(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "success": false, "error": error }))).into_response()
}

pub fn user_json(id: &str, role: &str) -> Value {
    json!({
        "id": id,
        "name": "Dr. Sari Wulandari",
        "email": "sari@univ.ac.id",
        "role": role,
        "nidn": "0012345678",
        "isActive": true
    })
}

pub fn research_json(id: &str, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "leaderId": "u1",
        "scheme": "Penelitian Dasar",
        "year": 2025,
        "budget": 25000000.0,
        "status": status,
        "teamMembers": [{ "name": "Dr. Sari Wulandari", "role": "ketua" }]
    })
}

pub fn service_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "leaderId": "u1",
        "scheme": "PKM",
        "partnerName": "Desa Sukamaju",
        "year": 2025,
        "budget": 10000000.0,
        "status": "draft"
    })
}

/// Poll `check` until it holds or a second has passed
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
