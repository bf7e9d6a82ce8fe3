use anyhow::Result;
use clap::Parser;

#[path = "mod.rs"]
mod agent_service;
#[path = "../shared/mod.rs"]
mod shared;

#[tokio::main]
async fn main() -> Result<()> {
    // A local .env is optional; real environment variables take precedence
    let _ = dotenvy::dotenv();

    let config = agent_service::config::Config::parse();

    // Initialize service logging; the guards flush buffered lines on exit
    let _log_guards = shared::logging::init_service_logging(&config.log_dir, "agent_service")?;

    agent_service::run_server(config).await
}
