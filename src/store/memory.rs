//! In-process profile store
//!
//! Used by tests and by `STORE_BACKEND=memory`. Ids come from a counter that
//! only moves forward, so deleted ids are never handed out again.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use super::{ProfileStore, StoreResult};
use crate::domain::profiles::{Profile, ProfileFields, ProfileId};

#[derive(Default)]
pub struct MemoryProfileStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    profiles: BTreeMap<ProfileId, Profile>,
    last_id: ProfileId,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn find_all(&self) -> StoreResult<Vec<Profile>> {
        Ok(self.inner.read().profiles.values().cloned().collect())
    }

    async fn find_by_id(&self, id: ProfileId) -> StoreResult<Option<Profile>> {
        Ok(self.inner.read().profiles.get(&id).cloned())
    }

    async fn create(&self, fields: ProfileFields) -> StoreResult<Profile> {
        let mut inner = self.inner.write();
        inner.last_id += 1;
        let profile = fields.into_profile(inner.last_id);
        inner.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn update_by_id(
        &self,
        id: ProfileId,
        fields: ProfileFields,
    ) -> StoreResult<Option<Profile>> {
        let mut inner = self.inner.write();
        Ok(inner.profiles.get_mut(&id).map(|existing| {
            *existing = fields.into_profile(id);
            existing.clone()
        }))
    }

    async fn delete_by_id(&self, id: ProfileId) -> StoreResult<bool> {
        Ok(self.inner.write().profiles.remove(&id).is_some())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
