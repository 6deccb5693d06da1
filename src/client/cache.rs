//! Local, ordered copy of the profile collection.

use std::collections::{HashMap, HashSet};

use crate::domain::profiles::{Profile, ProfileId};

/// A server-confirmed change to fold into the local list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconcile {
    /// Full collection from a list request; replaces everything.
    Loaded(Vec<Profile>),
    Created(Profile),
    Updated(Profile),
    Deleted(ProfileId),
}

/// Profiles in display order with an id index.
///
/// Created records are appended in the order their responses arrived, which
/// may differ from store order until the next load.
#[derive(Debug, Clone, Default)]
pub struct ProfileCache {
    entries: Vec<Profile>,
    index: HashMap<ProfileId, usize>,
}

impl ProfileCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, change: Reconcile) {
        match change {
            Reconcile::Loaded(mut profiles) => {
                // A list response never repeats an id; keep the first if it does
                let mut seen = HashSet::new();
                profiles.retain(|p| seen.insert(p.id));
                self.entries = profiles;
                self.reindex(0);
            }
            // Same placement rule for both: replace in place if known, else append
            Reconcile::Created(profile) | Reconcile::Updated(profile) => self.upsert(profile),
            Reconcile::Deleted(id) => {
                if let Some(pos) = self.index.remove(&id) {
                    self.entries.remove(pos);
                    self.reindex(pos);
                }
            }
        }
    }

    fn upsert(&mut self, profile: Profile) {
        match self.index.get(&profile.id) {
            Some(&pos) => self.entries[pos] = profile,
            None => {
                self.index.insert(profile.id, self.entries.len());
                self.entries.push(profile);
            }
        }
    }

    fn reindex(&mut self, from: usize) {
        if from == 0 {
            self.index.clear();
        }
        for (pos, profile) in self.entries.iter().enumerate().skip(from) {
            self.index.insert(profile.id, pos);
        }
    }

    pub fn get(&self, id: ProfileId) -> Option<&Profile> {
        self.index.get(&id).map(|&pos| &self.entries[pos])
    }

    pub fn as_slice(&self) -> &[Profile] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: ProfileId, name: &str) -> Profile {
        Profile {
            id,
            name: name.into(),
            email: format!("{}@x.io", name.to_lowercase()),
            gender: "other".into(),
            age: 30,
        }
    }

    fn ids(cache: &ProfileCache) -> Vec<ProfileId> {
        cache.as_slice().iter().map(|p| p.id).collect()
    }

    fn loaded(names: &[(ProfileId, &str)]) -> ProfileCache {
        let mut cache = ProfileCache::new();
        cache.apply(Reconcile::Loaded(
            names.iter().map(|(id, n)| profile(*id, n)).collect(),
        ));
        cache
    }

    #[test]
    fn created_profiles_append_in_arrival_order() {
        let mut cache = loaded(&[(1, "Ada")]);
        cache.apply(Reconcile::Created(profile(5, "Grace")));
        cache.apply(Reconcile::Created(profile(4, "Linus")));

        assert_eq!(ids(&cache), vec![1, 5, 4]);
    }

    #[test]
    fn update_keeps_position_and_other_entries() {
        let mut cache = loaded(&[(1, "Ada"), (2, "Grace"), (3, "Linus")]);
        let before = cache.as_slice().to_vec();

        let mut changed = profile(2, "Grace");
        changed.age = 86;
        cache.apply(Reconcile::Updated(changed.clone()));

        assert_eq!(ids(&cache), vec![1, 2, 3]);
        assert_eq!(cache.get(2), Some(&changed));
        assert_eq!(cache.as_slice()[0], before[0]);
        assert_eq!(cache.as_slice()[2], before[2]);
    }

    #[test]
    fn update_of_uncached_profile_appends() {
        let mut cache = loaded(&[(1, "Ada")]);
        cache.apply(Reconcile::Updated(profile(9, "Grace")));
        assert_eq!(ids(&cache), vec![1, 9]);
    }

    #[test]
    fn delete_removes_one_and_reindexes() {
        let mut cache = loaded(&[(1, "Ada"), (2, "Grace"), (3, "Linus")]);
        cache.apply(Reconcile::Deleted(2));

        assert_eq!(ids(&cache), vec![1, 3]);
        assert_eq!(cache.get(3).map(|p| p.name.as_str()), Some("Linus"));
        assert!(cache.get(2).is_none());

        cache.apply(Reconcile::Deleted(42));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn load_replaces_previous_state() {
        let mut cache = loaded(&[(1, "Ada"), (2, "Grace")]);
        cache.apply(Reconcile::Loaded(vec![profile(7, "Linus"), profile(7, "Dup")]));

        assert_eq!(ids(&cache), vec![7]);
        assert!(cache.get(1).is_none());
        assert_eq!(cache.get(7).map(|p| p.name.as_str()), Some("Linus"));
    }
}
