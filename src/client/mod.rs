//! Profile client
//!
//! Mirrors the server's profile collection in a local ordered list and keeps
//! it reconciled with the responses of create, update and delete calls.

pub mod api;
pub mod cache;
pub mod edit;
pub mod error;
pub mod profile_client;

pub use api::ProfileApi;
pub use cache::{ProfileCache, Reconcile};
pub use edit::{EditSession, EditState, EditTarget, PendingSubmit, ProfileForm};
pub use error::ClientError;
pub use profile_client::ProfileClient;
