//! Profile record synchronization: a small REST store for profiles and a
//! client that keeps a local copy of the collection reconciled with it.

pub mod api;
pub mod app;
pub mod client;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod store;
