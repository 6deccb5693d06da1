//! Service layer modules for external integrations.

pub mod cache;

pub use cache::{ProfileReadCache, RedisCache};
