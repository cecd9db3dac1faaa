use document_service::config::DocumentConfig;
use document_service::services::init_metrics;
use document_service::startup::Application;
use service_core::error::AppError;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = DocumentConfig::load()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )?;

    // Initialize metrics recorder (must be before any metrics are recorded)
    init_metrics()?;

    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        store_backend = ?config.store.backend,
        module_policy = config.module_policy.as_str(),
        "Starting document service"
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        e
    })?;

    app.run_until_stopped().await?;

    tracing::info!("Document service stopped");

    Ok(())
}
