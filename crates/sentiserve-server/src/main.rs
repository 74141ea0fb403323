//! SentiServe
//!
//! Loads a serialized sentiment model at startup and serves predictions over
//! HTTP. A model that fails to load does not stop the server; every
//! prediction request then reports the load failure instead.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use sentiserve_classifiers::ModelLoader;
use std::net::SocketAddr;
use std::path::Path;
use tokio::signal;
use tracing::{info, warn};

use sentiserve_server::cli::{Cli, Commands};
use sentiserve_server::diagnostics::render_report;
use sentiserve_server::{create_router, AppState, ModelState, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting SentiServe");

    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded successfully");

    if let Some(Commands::CheckModel { path }) = &cli.command {
        return check_model(path.as_deref().unwrap_or(config.model_path.as_path()));
    }

    info!("Model: {}", config.model_path.display());

    let metrics_handle = init_metrics()?;

    let model = ModelState::load(&config.model_path);
    if !model.is_loaded() {
        warn!("Serving without a model; /predict will report the load failure");
    }
    let state = AppState::new(model).with_metrics(metrics_handle);

    let addr: SocketAddr = config.bind_address().parse()?;
    let app = create_router(state, config.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Run every load strategy against the model file and print the report
fn check_model(path: &Path) -> Result<()> {
    let inspection = ModelLoader::default().inspect(path);
    println!("{}", render_report(&inspection));

    if !inspection.is_loadable() {
        anyhow::bail!("No load strategy could read {}", path.display());
    }
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Shutdown signal received, stopping server...");
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("sentiserve=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sentiserve=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "sentiserve_requests_total",
        "Total number of prediction requests by outcome"
    );
    metrics::describe_histogram!(
        "sentiserve_prediction_latency_us",
        metrics::Unit::Microseconds,
        "Prediction request latency in microseconds"
    );
    metrics::describe_counter!(
        "sentiserve_confidence_skipped_total",
        "Predictions returned without confidence because probabilities failed"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
