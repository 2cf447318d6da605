// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use ganji_rust_server::{
    api::router,
    config::{AppConfig, LogFormat, TlsConfig},
    network::Network,
    state::AppState,
};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let tls = config.tls.clone();

    let state = AppState::new(config);
    for network in [Network::Testnet, Network::Mainnet] {
        info!(
            %network,
            litecoin = state.litecoin.is_configured(network),
            solana = state.solana.is_configured(network),
            "Chain endpoints"
        );
    }

    // Background tasks stop on this token
    let shutdown = CancellationToken::new();
    tokio::spawn(state.rate_limiter.clone().run_sweeper(shutdown.clone()));

    let app = router(state).into_make_service_with_connect_info::<SocketAddr>();

    match tls {
        Some(tls) => serve_tls(addr, &tls, app, shutdown.clone()).await?,
        None => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!(%addr, "Ganji gateway listening on http://{addr} (docs at /docs)");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
                .await?;
        }
    }

    shutdown.cancel();
    info!("Server stopped");
    Ok(())
}

async fn serve_tls(
    addr: SocketAddr,
    tls: &TlsConfig,
    app: axum::extract::connect_info::IntoMakeServiceWithConnectInfo<axum::Router, SocketAddr>,
    shutdown: CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "rustls crypto provider already installed")?;

    let tls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;

    let handle = Handle::new();
    let signal_handle = handle.clone();
    tokio::spawn(async move {
        shutdown_signal(shutdown).await;
        signal_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });

    info!(%addr, "Ganji gateway listening on https://{addr} (docs at /docs)");
    axum_server::bind_rustls(addr, tls_config)
        .handle(handle)
        .serve(app)
        .await?;
    Ok(())
}

/// Resolves on Ctrl-C, SIGTERM, or when `shutdown` is cancelled elsewhere.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
        _ = shutdown.cancelled() => {},
    }

    info!("Shutdown signal received");
    shutdown.cancel();
}
