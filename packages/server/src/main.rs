use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use common::storage::FilesystemBlobStore;
use livestore::Store;
use tracing::{Level, info};

use server::config::AppConfig;
use server::state::AppState;
use server::{build_router, jobs, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let blobs = FilesystemBlobStore::new(
        PathBuf::from(&config.storage.root),
        config.storage.max_upload_bytes,
    )
    .await?;

    let state = AppState {
        store: Store::new(),
        blobs: Arc::new(blobs),
        config: config.clone(),
    };

    seed::seed_bootstrap_admin(&state)?;

    if state.config.scheduler.enabled {
        tokio::spawn(jobs::monthly::run_monthly_scheduler(state.clone()));
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
