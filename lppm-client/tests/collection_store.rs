// lppm-client/tests/collection_store.rs
// Remote collection cache against a stubbed API

mod common;

use axum::Router;
use axum::extract::{Path, RawQuery};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use common::{Captured, Hits, client, fail, ok, ok_list, research_json, service_json};
use lppm_client::ErrorKind;
use lppm_client::notify::{NoticeBus, NoticeLevel};
use lppm_client::store::{ResearchStore, ServiceStore};
use serde_json::{Value, json};
use shared::models::{ResearchUpdate, ServiceCreate};
use shared::request::SortOrder;

fn service_create(title: &str) -> ServiceCreate {
    ServiceCreate {
        title: title.into(),
        description: None,
        scheme: "PKM".into(),
        partner_name: "Desa Sukamaju".into(),
        location: Some("Kab. Bandung".into()),
        year: 2025,
        budget: 10_000_000.0,
        start_date: None,
        end_date: None,
        team_members: Vec::new(),
    }
}

fn research_list_router(queries: Captured) -> Router {
    Router::new().route(
        "/api/research",
        get(move |RawQuery(query): RawQuery| {
            let queries = queries.clone();
            async move {
                queries.push(query.unwrap_or_default());
                ok_list(
                    json!([
                        research_json("1", "Deteksi dini stunting", "draft"),
                        research_json("2", "Energi surya desa", "submitted"),
                    ]),
                    1,
                    10,
                    2,
                )
            }
        }),
    )
}

#[tokio::test]
async fn test_create_appends_server_record() {
    let hits = Hits::default();
    let router = Router::new().route(
        "/api/service",
        post({
            let hits = hits.clone();
            move |axum::Json(body): axum::Json<Value>| async move {
                hits.hit();
                let title = body["title"].as_str().unwrap_or_default().to_string();
                ok(service_json("x", &title))
            }
        }),
    );
    let store = ServiceStore::new(client(router), NoticeBus::new());

    let record = store
        .create(service_create("Pelatihan literasi digital"))
        .await
        .unwrap();

    assert_eq!(record.id, "x");
    let items = store.items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "x");
    assert_eq!(items[0].title, "Pelatihan literasi digital");
    assert_eq!(hits.count(), 1);

    let state = store.snapshot().await;
    assert!(!state.is_loading);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_create_with_invalid_payload_sends_nothing() {
    let hits = Hits::default();
    let router = Router::new().route(
        "/api/service",
        post({
            let hits = hits.clone();
            move || async move {
                hits.hit();
                ok(service_json("x", "never"))
            }
        }),
    );
    let store = ServiceStore::new(client(router), NoticeBus::new());

    let mut payload = service_create("");
    payload.partner_name = String::new();
    let err = store.create(payload).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(hits.count(), 0);
    assert!(store.items().await.is_empty());
    let message = store.error().await.unwrap();
    assert!(message.contains("Partner name is required"));
}

#[tokio::test]
async fn test_failed_delete_keeps_record() {
    let router = research_list_router(Captured::default()).route(
        "/api/research/{id}",
        delete(|| async { axum::Json(json!({ "success": false })) }),
    );
    let notices = NoticeBus::new();
    let store = ResearchStore::new(client(router), notices.clone());
    store.fetch().await.unwrap();
    store.set_page(1).await.unwrap();

    let mut rx = notices.subscribe();
    let deleted = store.delete("42").await;
    assert!(!deleted);

    // same for a cached id
    assert!(!store.delete("2").await);
    let state = store.snapshot().await;
    assert!(state.items.iter().any(|r| r.id == "2"));
    assert_eq!(state.items.len(), 2);
    assert!(!state.error.unwrap_or_default().is_empty());
    assert_eq!(rx.recv().await.unwrap().level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_failed_delete_of_fetched_id_42() {
    let router = Router::new()
        .route(
            "/api/research",
            get(|| async {
                ok_list(
                    json!([research_json("42", "Irigasi tetes cerdas", "draft")]),
                    1,
                    10,
                    1,
                )
            }),
        )
        .route(
            "/api/research/{id}",
            delete(|| async { axum::Json(json!({ "success": false })) }),
        );
    let store = ResearchStore::new(client(router), NoticeBus::new());
    store.fetch().await.unwrap();

    assert!(!store.delete("42").await);
    let state = store.snapshot().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, "42");
    assert_eq!(state.error.as_deref(), Some("Request failed"));
}

#[tokio::test]
async fn test_delete_removes_record() {
    let deleted = Captured::default();
    let router = research_list_router(Captured::default()).route(
        "/api/research/{id}",
        delete({
            let deleted = deleted.clone();
            move |Path(id): Path<String>| async move {
                deleted.push(id);
                axum::Json(json!({ "success": true, "message": "Deleted" }))
            }
        }),
    );
    let store = ResearchStore::new(client(router), NoticeBus::new());
    store.fetch().await.unwrap();
    assert_eq!(store.snapshot().await.pagination.total, 2);

    assert!(store.delete("1").await);
    assert_eq!(deleted.all(), vec!["1".to_string()]);

    let state = store.snapshot().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, "2");
    assert_eq!(state.pagination.total, 1);
}

#[tokio::test]
async fn test_delete_with_no_content_removes_record() {
    let router = research_list_router(Captured::default()).route(
        "/api/research/{id}",
        delete(|| async { StatusCode::NO_CONTENT }),
    );
    let store = ResearchStore::new(client(router), NoticeBus::new());
    store.fetch().await.unwrap();

    assert!(store.delete("2").await);
    let state = store.snapshot().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, "1");
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_update_replaces_by_id() {
    let router = research_list_router(Captured::default()).route(
        "/api/research/{id}",
        put(|Path(id): Path<String>, axum::Json(body): axum::Json<Value>| async move {
            let title = body["title"].as_str().unwrap_or_default().to_string();
            ok(research_json(&id, &title, "draft"))
        }),
    );
    let store = ResearchStore::new(client(router), NoticeBus::new());
    store.fetch().await.unwrap();

    let update = ResearchUpdate {
        title: Some("Deteksi dini stunting berbasis citra".into()),
        ..Default::default()
    };
    let record = store.update("1", update).await.unwrap();
    assert_eq!(record.title, "Deteksi dini stunting berbasis citra");

    let items = store.items().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Deteksi dini stunting berbasis citra");
    assert_eq!(items[1].title, "Energi surya desa");
}

#[tokio::test]
async fn test_failed_update_leaves_items_unchanged() {
    let router = research_list_router(Captured::default()).route(
        "/api/research/{id}",
        put(|| async { fail(StatusCode::FORBIDDEN, "Only drafts can be edited") }),
    );
    let store = ResearchStore::new(client(router), NoticeBus::new());
    store.fetch().await.unwrap();
    let before = store.items().await;

    let update = ResearchUpdate {
        budget: Some(1.0),
        ..Default::default()
    };
    let err = store.update("2", update).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);

    assert_eq!(store.items().await, before);
    assert_eq!(
        store.error().await.as_deref(),
        Some("Permission denied: Only drafts can be edited")
    );
}

#[tokio::test]
async fn test_query_changes_reset_page_and_refetch() {
    let queries = Captured::default();
    let store = ResearchStore::new(client(research_list_router(queries.clone())), NoticeBus::new());

    store.set_page(3).await.unwrap();
    assert_eq!(queries.last().as_deref(), Some("page=3&limit=10"));

    store.set_filter("status", "submitted").await.unwrap();
    assert_eq!(queries.last().as_deref(), Some("page=1&limit=10&status=submitted"));

    store.set_page(2).await.unwrap();
    store.set_sort("createdAt", SortOrder::Asc).await.unwrap();
    assert_eq!(
        queries.last().as_deref(),
        Some("page=1&limit=10&sortBy=createdAt&sortOrder=asc&status=submitted")
    );

    store.set_page(2).await.unwrap();
    store.set_page_size(25).await.unwrap();
    assert!(queries.last().unwrap().starts_with("page=1&limit=25"));

    store.set_page(2).await.unwrap();
    store.set_search("air bersih").await.unwrap();
    assert!(queries.last().unwrap().starts_with("page=1&limit=25&search=air%20bersih"));

    store.set_page(2).await.unwrap();
    store.clear_filters().await.unwrap();
    assert_eq!(
        queries.last().as_deref(),
        Some("page=1&limit=25&sortBy=createdAt&sortOrder=asc")
    );

    // every setter refetched exactly once
    assert_eq!(queries.all().len(), 10);
}

#[tokio::test]
async fn test_set_query_fetches_once_and_keeps_page() {
    let queries = Captured::default();
    let store = ResearchStore::new(client(research_list_router(queries.clone())), NoticeBus::new());

    let query = store
        .query()
        .await
        .paginate(2, 5)
        .filter("status", "submitted")
        .search("air bersih");
    store.set_query(query).await.unwrap();

    assert_eq!(
        queries.all(),
        vec!["page=2&limit=5&search=air%20bersih&status=submitted".to_string()]
    );
    assert_eq!(store.query().await.page, 2);
}

#[tokio::test]
async fn test_fetch_error_keeps_previous_items() {
    let calls = Hits::default();
    let router = Router::new().route(
        "/api/research",
        get({
            let calls = calls.clone();
            move || async move {
                calls.hit();
                if calls.count() == 1 {
                    ok_list(json!([research_json("1", "Deteksi dini stunting", "draft")]), 1, 10, 1)
                } else {
                    fail(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable")
                }
            }
        }),
    );
    let store = ResearchStore::new(client(router), NoticeBus::new());
    store.fetch().await.unwrap();
    assert!(store.set_page(2).await.is_err());

    let state = store.snapshot().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.error.as_deref(), Some("Database unavailable"));

    store.clear_error().await;
    store.reset().await;
    let state = store.snapshot().await;
    assert!(state.items.is_empty());
    assert!(state.error.is_none());
    assert_eq!(state.query.page, 1);
}

#[tokio::test]
async fn test_fetch_one_sets_current() {
    let router = Router::new().route(
        "/api/research/{id}",
        get(|Path(id): Path<String>| async move {
            if id == "7" {
                ok(research_json("7", "Bioplastik dari singkong", "approved"))
            } else {
                fail(StatusCode::NOT_FOUND, "Proposal not found")
            }
        }),
    );
    let store = ResearchStore::new(client(router), NoticeBus::new());

    let record = store.fetch_one("7").await.unwrap();
    assert_eq!(store.snapshot().await.current, Some(record));

    let err = store.fetch_one("8").await.unwrap_err();
    assert!(matches!(err, lppm_client::ClientError::NotFound(_)));
}
