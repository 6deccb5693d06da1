use anyhow::Result;
use std::sync::Arc;

use profile_sync::{
    app, config,
    config::StoreBackend,
    db, logging,
    services::{ProfileReadCache, RedisCache},
    store::{MemoryProfileStore, PgProfileStore, ProfileStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = config::Settings::from_env()?;

    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting profile-sync"
    );

    let store: Arc<dyn ProfileStore> = match &settings.store {
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = db::create_pool(database_url, *max_connections).await?;
            Arc::new(PgProfileStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory profile store; data is lost on restart");
            Arc::new(MemoryProfileStore::new())
        }
    };

    // The cache is optional; an unreachable Redis only disables it
    let cache: Option<Arc<dyn ProfileReadCache>> = match &settings.redis_url {
        Some(url) => match RedisCache::new(url, settings.redis_cache_ttl_seconds).await {
            Ok(cache) => Some(Arc::new(cache)),
            Err(e) => {
                tracing::warn!(error = ?e, "Redis unavailable - profile cache disabled");
                None
            }
        },
        None => None,
    };

    let state = app::AppState::new(store, cache, settings.clone());
    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
