use indexer_service::config::IndexerConfig;
use indexer_service::startup::Application;
use service_core::observability::{init_metrics, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = IndexerConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "indexer-service",
        &config.telemetry.log_level,
        config.telemetry.otlp_endpoint.as_deref(),
    )?;

    let metrics = init_metrics()?;

    let app = Application::build(config, Some(metrics)).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    app.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
