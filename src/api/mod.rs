//! HTTP API for submitting build logs to the agent.
//!
//! ## Endpoints
//!
//! - `GET /api/health` - Health check
//! - `POST /api/analyze` - Analyze a build log source

mod routes;
pub mod types;

pub use routes::{router, AppState};

use std::sync::Arc;

use crate::agent::Agent;
use crate::config::Config;

/// Serve the API on the configured host and port until the process exits.
pub async fn serve(config: &Config, agent: Agent) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    let app = router(Arc::new(AppState { agent }));
    axum::serve(listener, app).await?;

    Ok(())
}
