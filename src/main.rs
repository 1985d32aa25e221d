use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use clientapi::config::{config, AppConfig};
use clientapi::rpc::{GrpcCoreClient, GrpcSecurityClient};
use clientapi::tracking::OperationTracker;
use clientapi::AppState;

/// REST gateway in front of the core and security services.
#[derive(Debug, Parser)]
#[command(name = "clientapi", version, about)]
struct Cli {
    /// Bind address (overrides CLIENTAPI_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides CLIENTAPI_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Core service endpoint (overrides CORE_SERVICE_URL)
    #[arg(long)]
    core_url: Option<String>,

    /// Security service endpoint (overrides SECURITY_SERVICE_URL)
    #[arg(long)]
    security_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up service URLs and ports
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = apply_cli(config().clone(), cli);
    config.validate().context("invalid configuration")?;

    let default_filter = if config.api.enable_request_logging {
        "clientapi=info,tower_http=info"
    } else {
        "clientapi=info,tower_http=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_target(false)
        .init();

    tracing::info!("Starting clientapi in {:?} mode", config.environment);

    let connect_timeout = config.connect_timeout();
    let core = GrpcCoreClient::connect_lazy(&config.backend.core_service_url, connect_timeout)
        .context("core service endpoint")?;
    let security = GrpcSecurityClient::connect_lazy(&config.backend.security_service_url, connect_timeout)
        .context("security service endpoint")?;

    let operations = OperationTracker::new();
    let state = AppState::new(
        Arc::new(core),
        Arc::new(security),
        config.timeouts.clone(),
        operations.clone(),
    );
    let app = clientapi::app(state, &config.api);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(
        addr = %bind_addr,
        core = %config.backend.core_service_url,
        security = %config.backend.security_service_url,
        "clientapi listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // No new requests are accepted past this point
    if operations.wait_for_drain(config.shutdown_drain()).await {
        tracing::info!("all operations drained");
    }
    Ok(())
}

fn apply_cli(mut config: AppConfig, cli: Cli) -> AppConfig {
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(url) = cli.core_url {
        config.backend.core_service_url = url;
    }
    if let Some(url) = cli.security_url {
        config.backend.security_service_url = url;
    }
    config
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("failed to install SIGTERM handler: {}", e);
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
    tracing::info!("shutdown signal received, draining");
}
