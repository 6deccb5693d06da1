#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use profile_sync::app::{create_app, AppState};
use profile_sync::config::Settings;
use profile_sync::domain::{Profile, ProfileFields, ProfileId};
use profile_sync::services::ProfileReadCache;
use profile_sync::store::{MemoryProfileStore, ProfileStore, StoreError, StoreResult};

pub fn settings() -> Settings {
    Settings::from_lookup(|key| match key {
        "STORE_BACKEND" => Some("memory".to_string()),
        _ => None,
    })
    .expect("memory settings")
}

pub fn fields(name: &str, age: i32) -> ProfileFields {
    ProfileFields {
        name: name.to_string(),
        email: format!("{}@x.io", name.to_lowercase()),
        gender: "female".to_string(),
        age,
    }
}

/// In-memory store that can be told to fail or to stall creates and lists.
#[derive(Default)]
pub struct TestStore {
    inner: MemoryProfileStore,
    failing: AtomicBool,
    create_delay: Option<Duration>,
    list_delay: Option<Duration>,
}

impl TestStore {
    pub fn with_create_delay(delay: Duration) -> Self {
        Self {
            create_delay: Some(delay),
            ..Self::default()
        }
    }

    /// Lists take their snapshot first and answer after `delay`.
    pub fn with_list_delay(delay: Duration) -> Self {
        Self {
            list_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProfileStore for TestStore {
    async fn find_all(&self) -> StoreResult<Vec<Profile>> {
        self.check()?;
        let profiles = self.inner.find_all().await?;
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(profiles)
    }

    async fn find_by_id(&self, id: ProfileId) -> StoreResult<Option<Profile>> {
        self.check()?;
        self.inner.find_by_id(id).await
    }

    async fn create(&self, fields: ProfileFields) -> StoreResult<Profile> {
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        self.check()?;
        self.inner.create(fields).await
    }

    async fn update_by_id(
        &self,
        id: ProfileId,
        fields: ProfileFields,
    ) -> StoreResult<Option<Profile>> {
        self.check()?;
        self.inner.update_by_id(id, fields).await
    }

    async fn delete_by_id(&self, id: ProfileId) -> StoreResult<bool> {
        self.check()?;
        self.inner.delete_by_id(id).await
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.check()
    }
}

/// Map-backed profile cache with switchable write failures.
#[derive(Default)]
pub struct TestCache {
    entries: Mutex<HashMap<ProfileId, Profile>>,
    failing_puts: AtomicBool,
    delete_on_put: Mutex<Option<Arc<dyn ProfileStore>>>,
}

impl TestCache {
    pub fn entry(&self, id: ProfileId) -> Option<Profile> {
        self.entries.lock().get(&id).cloned()
    }

    pub fn insert(&self, profile: Profile) {
        self.entries.lock().insert(profile.id, profile);
    }

    pub fn set_failing_puts(&self, failing: bool) {
        self.failing_puts.store(failing, Ordering::SeqCst);
    }

    /// The next put first deletes its profile from `store`, as a DELETE
    /// landing between the handler's store read and its cache write would.
    pub fn delete_from_store_on_next_put(&self, store: Arc<dyn ProfileStore>) {
        *self.delete_on_put.lock() = Some(store);
    }
}

#[async_trait]
impl ProfileReadCache for TestCache {
    async fn get_profile(&self, id: ProfileId) -> Option<Profile> {
        self.entry(id)
    }

    async fn put_profile(&self, profile: &Profile) -> anyhow::Result<()> {
        let racing_delete = self.delete_on_put.lock().take();
        if let Some(store) = racing_delete {
            store.delete_by_id(profile.id).await?;
        }
        if self.failing_puts.load(Ordering::SeqCst) {
            anyhow::bail!("connection reset");
        }
        self.insert(profile.clone());
        Ok(())
    }

    async fn evict_profile(&self, id: ProfileId) -> anyhow::Result<bool> {
        Ok(self.entries.lock().remove(&id).is_some())
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

pub fn app_with(store: Arc<dyn ProfileStore>) -> Router {
    create_app(AppState::new(store, None, settings()))
}

pub fn app_with_cache(store: Arc<dyn ProfileStore>, cache: Arc<dyn ProfileReadCache>) -> Router {
    create_app(AppState::new(store, Some(cache), settings()))
}

/// Run one request through the router; empty bodies decode as `Null`.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(req.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

/// Serve the app on an ephemeral local port.
pub async fn spawn_server(store: Arc<dyn ProfileStore>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app_with(store))
            .await
            .expect("test server");
    });

    addr
}
