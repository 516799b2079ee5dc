//! `gcm-seal` — sealing service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise telemetry (JSON logs, optional OTLP export).
//! 3. Build the Axum router around a stateless [`AppState`].
//! 4. Serve over TLS when a certificate pair is configured, plain HTTP otherwise.

mod config;
mod server;
mod telemetry;

use anyhow::Result;
use tracing::{info, warn};

use config::Config;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        tls = cfg.tls_paths().is_some(),
        default_key_encoding = ?cfg.default_key_encoding,
        "gcm-seal starting"
    );

    // -----------------------------------------------------------------------
    // 3. Router
    // -----------------------------------------------------------------------
    let state = AppState::new(cfg.default_key_encoding);
    let router = server::router::build(state);

    // -----------------------------------------------------------------------
    // 4. HTTP(S) server
    // -----------------------------------------------------------------------
    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "listening");

    match cfg.tls_paths() {
        Some(paths) => {
            let acceptor = server::tls::load_acceptor(&paths)?;
            server::tls::serve(listener, acceptor, router).await?;
        }
        None => {
            warn!("TLS not configured; serving plain HTTP");
            axum::serve(listener, router).await?;
        }
    }

    Ok(())
}
