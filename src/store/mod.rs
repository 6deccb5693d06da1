//! Persistence collaborator for profiles.
//!
//! Handlers only talk to [`ProfileStore`]; the backing engine is chosen at
//! startup from configuration.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::profiles::{Profile, ProfileFields, ProfileId};

pub use memory::MemoryProfileStore;
pub use postgres::PgProfileStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// All profiles, ascending by id.
    async fn find_all(&self) -> StoreResult<Vec<Profile>>;

    async fn find_by_id(&self, id: ProfileId) -> StoreResult<Option<Profile>>;

    /// Insert a new record; the store assigns the id.
    async fn create(&self, fields: ProfileFields) -> StoreResult<Profile>;

    /// Replace the mutable fields. `Ok(None)` if no record has this id.
    async fn update_by_id(&self, id: ProfileId, fields: ProfileFields)
        -> StoreResult<Option<Profile>>;

    /// Returns whether a record was removed.
    async fn delete_by_id(&self, id: ProfileId) -> StoreResult<bool>;

    async fn health_check(&self) -> StoreResult<()>;
}
