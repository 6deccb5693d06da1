mod common;

use axum::{http::Method, http::StatusCode, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use common::{app_with_cache, fields, send, TestCache, TestStore};
use profile_sync::domain::Profile;
use profile_sync::store::ProfileStore;

fn setup() -> (Arc<TestStore>, Arc<TestCache>, Router) {
    let store = Arc::new(TestStore::default());
    let cache = Arc::new(TestCache::default());
    let app = app_with_cache(store.clone(), cache.clone());
    (store, cache, app)
}

fn body(name: &str, age: i32) -> Value {
    serde_json::to_value(fields(name, age)).unwrap()
}

fn profile(value: Value) -> Profile {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn reads_are_served_from_the_cache() {
    let (store, cache, app) = setup();
    let ada = store.create(fields("Ada", 36)).await.unwrap();
    cache.insert(Profile {
        name: "Cached Ada".into(),
        ..ada.clone()
    });

    // A hit answers without touching the store
    store.set_failing(true);
    let (status, body) = send(&app, Method::GET, &format!("/profiles/{}", ada.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Cached Ada");
}

#[tokio::test]
async fn a_miss_fills_the_cache() {
    let (store, cache, app) = setup();
    let ada = store.create(fields("Ada", 36)).await.unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/profiles/{}", ada.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile(body), ada);
    assert_eq!(cache.entry(ada.id), Some(ada));
}

#[tokio::test]
async fn writes_refresh_the_cached_entry() {
    let (_store, cache, app) = setup();

    let (status, created) = send(&app, Method::POST, "/profiles", Some(body("Ada", 36))).await;
    assert_eq!(status, StatusCode::CREATED);
    let created = profile(created);
    assert_eq!(cache.entry(created.id), Some(created.clone()));

    let uri = format!("/profiles/{}", created.id);
    let (status, updated) = send(&app, Method::PUT, &uri, Some(body("Ada", 37))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache.entry(created.id), Some(profile(updated)));

    let (_, read) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(read["age"], 37);
}

#[tokio::test]
async fn failed_cache_write_evicts_the_old_entry() {
    let (_store, cache, app) = setup();
    let (_, created) = send(&app, Method::POST, "/profiles", Some(body("Ada", 36))).await;
    let created = profile(created);
    assert!(cache.entry(created.id).is_some());

    cache.set_failing_puts(true);
    let uri = format!("/profiles/{}", created.id);
    let (status, _) = send(&app, Method::PUT, &uri, Some(body("Ada", 37))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache.entry(created.id), None);

    let (status, read) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["age"], 37);
}

#[tokio::test]
async fn delete_evicts_the_cached_entry() {
    let (_store, cache, app) = setup();
    let (_, created) = send(&app, Method::POST, "/profiles", Some(body("Ada", 36))).await;
    let id = profile(created).id;
    let uri = format!("/profiles/{}", id);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(cache.entry(id), None);

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn delete_racing_a_read_leaves_no_stale_entry() {
    let (store, cache, app) = setup();
    let ada = store.create(fields("Ada", 36)).await.unwrap();
    let uri = format!("/profiles/{}", ada.id);

    // The read sees Ada, then the record is deleted before the cache write
    cache.delete_from_store_on_next_put(store.clone());
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(ada));

    assert_eq!(cache.entry(ada.id), None);
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_a_working_cache() {
    let (_store, _cache, app) = setup();

    let (status, health) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["services"]["cache"], "ok");
}
