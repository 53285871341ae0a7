use std::sync::Arc;

use sportmatch_api::config::{AppConfig, StorageBackend};
use sportmatch_api::store::{MemoryStore, PgStore, Store};
use sportmatch_api::AppState;
use sportmatch_shared::clients::db::create_pool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sportmatch_shared::middleware::init_tracing("sportmatch-api");

    let config = AppConfig::load()?;
    let port = config.port;

    let metrics_handle = sportmatch_shared::middleware::init_metrics()?;

    let store: Arc<dyn Store> = match config.storage {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url, config.db_pool_size)?;
            let store = PgStore::new(pool);
            if config.run_migrations {
                store.run_migrations().await?;
            }
            Arc::new(store)
        }
        StorageBackend::Memory => {
            tracing::warn!("using the in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let app = sportmatch_api::router(AppState::new(store, config, metrics_handle));

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "sportmatch-api starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("sportmatch-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
