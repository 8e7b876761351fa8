// Knowledge Search Service Main Entry Point
// Serves the search webhook: vector search over Qdrant with a keyword fallback
// against the relational store
use anyhow::Result;
use knowledge_search::{telemetry, Application, ServiceConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    dotenv::dotenv().ok();
    let config = ServiceConfig::from_env()?;

    telemetry::init_tracing(config.log_format, "info");
    info!(host = %config.host, port = config.port, "Starting knowledge search service");

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    info!("Knowledge search service stopped");
    Ok(())
}
