//! Profile routes
//!
//! CRUD endpoints over the profile collection. Single-profile reads go
//! through the Redis cache when one is configured.
//!
//! Every cache write is followed by a store read; if the two disagree, or
//! either call fails, the entry is evicted. A write racing a delete or a
//! newer update therefore cannot leave an old profile in the cache.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use std::sync::Arc;

use crate::api::{Created, NoContent};
use crate::app::AppState;
use crate::domain::profiles::{Profile, ProfileId, ProfileRequest};
use crate::error::{ApiError, ApiResult};
use crate::services::ProfileReadCache;

/// GET /profiles
pub async fn list_profiles(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Profile>>> {
    let profiles = state.store.find_all().await?;

    tracing::debug!(count = profiles.len(), "Listed profiles");

    Ok(Json(profiles))
}

/// GET /profiles/:id
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    id: Result<Path<ProfileId>, PathRejection>,
) -> ApiResult<Json<Profile>> {
    let Path(id) = id?;

    if let Some(cache) = &state.cache {
        if let Some(cached) = cache.get_profile(id).await {
            tracing::debug!(profile_id = id, "Profile cache hit");
            return Ok(Json(cached));
        }
    }

    let profile = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Profile {} not found", id)))?;

    cache_profile(&state, &profile).await;

    Ok(Json(profile))
}

/// POST /profiles
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ProfileRequest>, JsonRejection>,
) -> ApiResult<Created<Profile>> {
    let Json(req) = body?;
    let fields = req.validate()?;

    let profile = state.store.create(fields).await?;

    tracing::info!(profile_id = profile.id, "Created profile");
    cache_profile(&state, &profile).await;

    Ok(Created(profile))
}

/// PUT /profiles/:id
///
/// Replaces all mutable fields. The body is validated before the id is
/// looked up, so an invalid body for an unknown id is a validation error.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    id: Result<Path<ProfileId>, PathRejection>,
    body: Result<Json<ProfileRequest>, JsonRejection>,
) -> ApiResult<Json<Profile>> {
    let Path(id) = id?;
    let Json(req) = body?;
    let fields = req.validate()?;

    let profile = state
        .store
        .update_by_id(id, fields)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Profile {} not found", id)))?;

    tracing::info!(profile_id = id, "Updated profile");
    cache_profile(&state, &profile).await;

    Ok(Json(profile))
}

/// DELETE /profiles/:id
///
/// Idempotent: deleting an unknown id also answers 204.
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    id: Result<Path<ProfileId>, PathRejection>,
) -> ApiResult<NoContent> {
    let Path(id) = id?;

    let removed = state.store.delete_by_id(id).await?;
    tracing::info!(profile_id = id, removed, "Deleted profile");

    if let Some(cache) = &state.cache {
        evict(cache.as_ref(), id).await;
    }

    Ok(NoContent)
}

async fn cache_profile(state: &AppState, profile: &Profile) {
    let Some(cache) = &state.cache else {
        return;
    };
    let cache = cache.as_ref();

    if let Err(e) = cache.put_profile(profile).await {
        tracing::warn!(profile_id = profile.id, error = %e, "Failed to cache profile");
        evict(cache, profile.id).await;
        return;
    }

    match state.store.find_by_id(profile.id).await {
        Ok(Some(current)) if current == *profile => {}
        Ok(_) => {
            tracing::debug!(profile_id = profile.id, "Profile changed while caching");
            evict(cache, profile.id).await;
        }
        Err(e) => {
            tracing::warn!(profile_id = profile.id, error = %e, "Could not confirm cached profile");
            evict(cache, profile.id).await;
        }
    }
}

async fn evict(cache: &dyn ProfileReadCache, id: ProfileId) {
    if let Err(e) = cache.evict_profile(id).await {
        // Nothing left to try; the entry expires with its TTL
        tracing::error!(profile_id = id, error = %e, "Failed to evict cached profile");
    }
}
