//! Bhavna Server
//!
//! Chat server that scores each user statement for sentiment (English,
//! Hindi and Hinglish) and reports the conversation-level trend.

use anyhow::Result;
use bhavna_engine::SentimentEngine;
use bhavna_server::{create_router, AppState, Cli, ServerConfig};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting Bhavna server");

    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded successfully");
    info!("Remote model: {}", config.engine.remote.model_id);
    info!(
        "Local model: {} (enabled: {})",
        config.engine.local.repo_id, config.engine.local.enabled
    );

    let metrics_handle = init_metrics()?;

    info!("Initializing sentiment engine...");
    let engine = SentimentEngine::from_config(&config.engine, cli.hf_token.clone()).await?;
    if !engine.hinglish_available() {
        warn!("Hinglish route unavailable, Hinglish text goes to the remote model");
    }
    let state = AppState::new(engine)
        .with_metrics(metrics_handle)
        .with_sessions(config.sessions.store());
    let cleanup = state
        .sessions
        .start_cleanup_task(config.sessions.cleanup_interval());
    info!(
        "Sessions expire after {}s idle, at most {} kept",
        config.sessions.idle_timeout_secs, config.sessions.max_sessions
    );

    let app = create_router(state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    cleanup.abort();
    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("bhavna=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bhavna=info"))
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
        "bhavna_statements_total",
        "Statements analyzed, by producing adapter"
    );
    metrics::describe_counter!(
        "bhavna_adapter_failures_total",
        "Adapter calls that failed or timed out"
    );
    metrics::describe_counter!(
        "bhavna_routing_demotions_total",
        "Transitions to lexicon-only routing"
    );
    metrics::describe_histogram!(
        "bhavna_classifier_latency_us",
        metrics::Unit::Microseconds,
        "Classifier latency in microseconds by adapter"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
