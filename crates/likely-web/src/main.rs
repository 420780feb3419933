//! Likely Web Server
//!
//! Run with: cargo run -p likely-web

use std::sync::Arc;

use likely_config::Config;
use likely_db::Database;
use likely_web::state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load(None)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    info!("Starting Likely web server...");

    let db = Database::open_with(&config.database.url, config.database.max_connections).await?;
    db.initialize().await?;

    let state = AppState::load(Arc::new(db), config.server.submission_list_limit).await;
    likely_web::serve(state, &config.bind_addr()).await
}
