//! `crypto-service` — binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (JSON logs, optional OTLP export).
//! 3. Build the encryption and signing strategies from the configured keys.
//! 4. Spawn background tasks: rate-limiter bucket cleanup.
//! 5. Build the Axum router and serve until Ctrl-C / SIGTERM.

mod config;
mod crypto;
mod server;
mod telemetry;

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time;
use tracing::{debug, info, warn};

use config::Config;
use server::middleware::ClientRateLimiter;
use server::state::AppState;

/// How often idle rate-limit buckets are dropped.
const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.listen_port,
        "crypto-service starting"
    );

    // -----------------------------------------------------------------------
    // 3. Strategies
    // -----------------------------------------------------------------------
    let encryption = crypto::build_encryption(
        cfg.encryption_strategy,
        cfg.encryption_key.as_ref().map(|k| k.expose()),
    )
    .context("failed to build encryption strategy")?;
    let signing = crypto::build_signing(cfg.signing_key.expose())
        .context("failed to build signing strategy")?;
    info!(
        encryption = encryption.name(),
        signing = signing.name(),
        "strategies ready"
    );
    if cfg.encryption_strategy == crypto::EncryptionAlgorithm::Base64 {
        warn!("base64 strategy selected: values are encoded, not encrypted");
    }

    let rate = NonZeroU32::new(cfg.rate_limit_per_second)
        .context("RATE_LIMIT_PER_SECOND must be > 0")?;
    let rate_limiter = Arc::new(ClientRateLimiter::per_second(rate));

    // -----------------------------------------------------------------------
    // 4. Background tasks
    // -----------------------------------------------------------------------
    let _cleanup = rate_limit_cleanup_task(rate_limiter.clone());

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(encryption, signing, rate_limiter);
    let router = server::router::build(state, Duration::from_secs(cfg.request_timeout_secs));

    let addr: SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "listening");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    info!("crypto-service stopped");
    telemetry::shutdown();
    Ok(())
}

/// Spawn a background task that periodically drops idle rate-limit buckets.
fn rate_limit_cleanup_task(limiter: Arc<ClientRateLimiter>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(RATE_LIMIT_CLEANUP_INTERVAL);
        // First tick fires immediately; nothing to clean yet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            limiter.retain_recent();
            debug!(clients = limiter.tracked_clients(), "rate-limit buckets pruned");
        }
    })
}

/// Resolve on Ctrl-C, or on SIGTERM where supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
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
    info!("shutdown signal received");
}
