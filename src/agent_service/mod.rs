use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};

use crate::agent_service::completion::GlmClient;
use crate::agent_service::config::Config;
use crate::agent_service::routes::create_router;
use crate::agent_service::state::AppState;

pub mod completion;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod logging_middleware;
pub mod models;
pub mod prompts;
pub mod routes;
pub mod state;
pub mod ticket;

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let config = config.validate()?;

    info!("Starting agent service...");
    info!(
        fast_model = %config.fast_model,
        smart_model = %config.smart_model,
        base_url = %config.base_url,
        "Completion provider configured"
    );

    let client = GlmClient::new(
        &config.base_url,
        &config.api_key,
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("Failed to create completion client")?;
    let state = AppState::new(config.model_defaults(), Arc::new(client));

    info!("Building routes...");
    let app = create_router(state);

    let bind_addr = config.bind_addr();
    info!("Binding agent service to {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Agent service ready at http://{}", bind_addr);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Err(e) = result {
        error!("Agent service error: {}", e);
        return Err(anyhow::anyhow!(e));
    }

    info!("Agent service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down agent service...");
}
