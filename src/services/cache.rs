//! Redis read cache for single profiles.
//!
//! Values are stored as JSON under `profile:<id>` with a TTL. Reads are best
//! effort: failures are logged and reported as misses so that the store
//! remains the source of truth. Writes report their errors so callers can
//! evict instead of leaving an old entry behind.

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use crate::domain::profiles::{Profile, ProfileId};

/// Single-profile read cache used by the HTTP handlers.
#[async_trait]
pub trait ProfileReadCache: Send + Sync {
    /// Cached copy of a profile; any failure counts as a miss.
    async fn get_profile(&self, id: ProfileId) -> Option<Profile>;

    async fn put_profile(&self, profile: &Profile) -> Result<()>;

    /// Drop the entry for `id`; `Ok(false)` when there was none.
    async fn evict_profile(&self, id: ProfileId) -> Result<bool>;

    async fn health_check(&self) -> Result<()>;
}

/// Redis cache client with connection pooling.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: Duration,
}

impl RedisCache {
    /// Create a new Redis cache connection.
    pub async fn new(redis_url: &str, default_ttl_seconds: u64) -> Result<Self> {
        let client = redis::Client::open(redis_url).context("Failed to create Redis client")?;

        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        tracing::info!("Redis cache connected");

        Ok(Self {
            conn,
            default_ttl: Duration::from_secs(default_ttl_seconds),
        })
    }

    #[instrument(skip(self), fields(cache_hit))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn.clone();

        let hit = match conn.get::<_, Option<String>>(key).await {
            Ok(Some(data)) => match serde_json::from_str(&data) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(key, error = %e, "Failed to deserialize cached value");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                error!(key, error = %e, "Redis get error");
                None
            }
        };

        tracing::Span::current().record("cache_hit", hit.is_some());
        hit
    }

    /// Store a value with the default TTL.
    #[instrument(skip(self, value))]
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let mut conn = self.conn.clone();

        let data = serde_json::to_string(value).context("Failed to serialize value for cache")?;

        conn.set_ex::<_, _, ()>(key, data, self.default_ttl.as_secs())
            .await
            .context("Failed to set cache value")?;

        debug!(key, ttl_secs = self.default_ttl.as_secs(), "Cached value");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();

        let deleted: i32 = conn.del(key).await.context("Failed to delete cache key")?;

        debug!(key, deleted = deleted > 0, "Cache delete");
        Ok(deleted > 0)
    }

    pub async fn health_check(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("Redis health check failed")?;
        Ok(())
    }
}

#[async_trait]
impl ProfileReadCache for RedisCache {
    async fn get_profile(&self, id: ProfileId) -> Option<Profile> {
        self.get(&keys::profile(id)).await
    }

    async fn put_profile(&self, profile: &Profile) -> Result<()> {
        self.set(&keys::profile(profile.id), profile).await
    }

    async fn evict_profile(&self, id: ProfileId) -> Result<bool> {
        self.delete(&keys::profile(id)).await
    }

    async fn health_check(&self) -> Result<()> {
        RedisCache::health_check(self).await
    }
}

/// Cache key builders
pub mod keys {
    use crate::domain::profiles::ProfileId;

    pub fn profile(id: ProfileId) -> String {
        format!("profile:{}", id)
    }
}

#[cfg(test)]
mod tests {
    use super::keys;

    #[test]
    fn profile_key_format() {
        assert_eq!(keys::profile(12), "profile:12");
    }
}
