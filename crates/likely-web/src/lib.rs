//! likely-web — HTTP API for the risk engine.
//!
//! Routes:
//!   - `GET  /`                     liveness message
//!   - `POST /score`                score a questionnaire
//!   - `GET  /submissions`          logged submissions, newest first
//!   - `GET  /api/baseline`         current baseline snapshot
//!   - `POST /api/baseline/reload`  reload the snapshot from the database

pub mod handlers;
pub mod router;
pub mod state;

use std::net::SocketAddr;

use tracing::info;

/// Bind `addr` and serve the router until the process is stopped.
pub async fn serve(state: state::AppState, addr: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = addr.parse()?;
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
