//! Client facade: server calls plus reconciliation into the local cache.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{ClientError, ProfileApi, ProfileCache, Reconcile};
use crate::config::ClientSettings;
use crate::domain::profiles::{Profile, ProfileFields, ProfileId};

/// Keeps a local list of profiles in step with the server.
///
/// The cache is only touched after the server acknowledged a request, so a
/// failed call leaves it exactly as it was. At most one mutating request is
/// outstanding at a time; a concurrent submit fails with
/// [`ClientError::Busy`] without reaching the network.
///
/// A load never overwrites a mutation acknowledged while the list request
/// was in flight: such a response is dropped and the list fetched again.
pub struct ProfileClient {
    api: ProfileApi,
    local: RwLock<LocalState>,
    in_flight: AtomicBool,
}

/// How many list responses `load` fetches before giving up on a busy list.
const MAX_LOAD_ATTEMPTS: usize = 3;

#[derive(Default)]
struct LocalState {
    cache: ProfileCache,
    /// Bumped by every acknowledged mutation.
    generation: u64,
}

impl LocalState {
    fn record(&mut self, change: Reconcile) {
        self.cache.apply(change);
        self.generation += 1;
    }
}

/// Clears the in-flight flag when the submit finishes or is dropped.
struct SubmitGuard<'a>(&'a AtomicBool);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ProfileClient {
    pub fn new(api: ProfileApi) -> Self {
        Self {
            api,
            local: RwLock::new(LocalState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> anyhow::Result<Self> {
        Ok(Self::new(ProfileApi::new(settings)?))
    }

    /// Snapshot of the local list in display order.
    pub fn profiles(&self) -> Vec<Profile> {
        self.local.read().cache.as_slice().to_vec()
    }

    pub fn profile(&self, id: ProfileId) -> Option<Profile> {
        self.local.read().cache.get(id).cloned()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Replace the local list with the server's collection.
    ///
    /// If a submit is acknowledged while the list request is outstanding,
    /// the response may predate it and is fetched again. After
    /// `MAX_LOAD_ATTEMPTS` such collisions the local list is kept as is.
    pub async fn load(&self) -> Result<usize, ClientError> {
        for attempt in 1..=MAX_LOAD_ATTEMPTS {
            let generation = self.local.read().generation;

            let profiles = self.api.list().await.inspect_err(|e| {
                tracing::warn!(error = %e, "Failed to load profiles; keeping local list");
            })?;

            let mut local = self.local.write();
            if local.generation == generation {
                let count = profiles.len();
                local.cache.apply(Reconcile::Loaded(profiles));
                tracing::debug!(count, attempt, "Loaded profiles");
                return Ok(count);
            }
            tracing::debug!(attempt, "Local list changed during load; fetching again");
        }

        let count = self.local.read().cache.len();
        tracing::warn!(count, "Local list kept changing during load; keeping local list");
        Ok(count)
    }

    pub async fn submit_create(&self, fields: ProfileFields) -> Result<Profile, ClientError> {
        let _guard = self.begin_submit()?;

        let created = self.api.create(&fields).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Failed to create profile");
        })?;

        self.local.write().record(Reconcile::Created(created.clone()));
        tracing::info!(profile_id = created.id, "Profile created");
        Ok(created)
    }

    pub async fn submit_update(
        &self,
        id: ProfileId,
        fields: ProfileFields,
    ) -> Result<Profile, ClientError> {
        let _guard = self.begin_submit()?;

        let updated = self.api.update(id, &fields).await.inspect_err(|e| {
            tracing::warn!(profile_id = id, error = %e, "Failed to update profile");
        })?;

        self.local.write().record(Reconcile::Updated(updated.clone()));
        tracing::info!(profile_id = id, "Profile updated");
        Ok(updated)
    }

    pub async fn submit_delete(&self, id: ProfileId) -> Result<(), ClientError> {
        let _guard = self.begin_submit()?;

        self.api.delete(id).await.inspect_err(|e| {
            tracing::warn!(profile_id = id, error = %e, "Failed to delete profile");
        })?;

        self.local.write().record(Reconcile::Deleted(id));
        tracing::info!(profile_id = id, "Profile deleted");
        Ok(())
    }

    fn begin_submit(&self) -> Result<SubmitGuard<'_>, ClientError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::Busy)?;
        Ok(SubmitGuard(&self.in_flight))
    }
}
