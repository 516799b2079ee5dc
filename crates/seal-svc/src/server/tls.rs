//! TLS listener setup using rustls.
//!
//! The certificate chain and private key are read from PEM files named in the
//! configuration. Each accepted TCP connection completes a TLS handshake and
//! is then served by hyper (HTTP/1.1 or HTTP/2, chosen by ALPN).

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{extract::Request, Router};
use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto,
};
use rustls::ServerConfig;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tower::ServiceExt;
use tracing::{debug, error, info, warn};

use crate::config::TlsPaths;

/// Build a [`rustls::ServerConfig`] from PEM-encoded certificate and private key bytes.
///
/// # Errors
///
/// Returns an error if the certificate or key cannot be parsed, or if rustls
/// rejects the configuration.
pub fn build_server_config(cert_pem: &[u8], key_pem: &[u8]) -> Result<Arc<ServerConfig>> {
    let certs = rustls_pemfile::certs(&mut std::io::BufReader::new(cert_pem))
        .collect::<Result<Vec<_>, _>>()
        .context("failed to parse TLS certificate chain")?;
    if certs.is_empty() {
        anyhow::bail!("no certificates found in PEM data");
    }

    let key = rustls_pemfile::private_key(&mut std::io::BufReader::new(key_pem))
        .context("failed to read TLS private key")?
        .context("no private key found in PEM data")?;

    let mut config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .context("failed to build rustls ServerConfig")?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(Arc::new(config))
}

/// Read the PEM files at `paths` and build a [`TlsAcceptor`].
///
/// # Errors
///
/// Returns an error if either file cannot be read or parsed.
pub fn load_acceptor(paths: &TlsPaths<'_>) -> Result<TlsAcceptor> {
    let cert_pem = std::fs::read(paths.cert)
        .with_context(|| format!("failed to read TLS certificate {}", paths.cert))?;
    let key_pem = std::fs::read(paths.key)
        .with_context(|| format!("failed to read TLS private key {}", paths.key))?;
    let config = build_server_config(&cert_pem, &key_pem)?;
    Ok(TlsAcceptor::from(config))
}

/// Accept loop: terminate TLS on each connection and serve `router` over it.
///
/// Runs until the process is killed. Handshake and connection errors are
/// logged and only affect the connection concerned.
pub async fn serve(listener: TcpListener, acceptor: TlsAcceptor, router: Router) -> Result<()> {
    info!(addr = %listener.local_addr()?, "tls listener ready");

    loop {
        let (tcp_stream, peer_addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                error!(error = %e, "accept error");
                continue;
            }
        };
        debug!(%peer_addr, "accepted TCP connection");

        let acceptor = acceptor.clone();
        let router = router.clone();
        tokio::spawn(async move {
            let tls_stream = match acceptor.accept(tcp_stream).await {
                Ok(s) => s,
                Err(e) => {
                    warn!(%peer_addr, error = %e, "tls handshake failed");
                    return;
                }
            };

            let service = hyper::service::service_fn(move |req: Request<Incoming>| {
                router.clone().oneshot(req)
            });

            if let Err(e) = auto::Builder::new(TokioExecutor::new())
                .serve_connection(TokioIo::new(tls_stream), service)
                .await
            {
                debug!(%peer_addr, error = %e, "connection closed with error");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_cert_pem() {
        let result = build_server_config(b"", b"");
        assert!(result.is_err());
    }

    #[test]
    fn rejects_garbage_pem() {
        let result = build_server_config(b"not a pem", b"also not a pem");
        assert!(result.is_err());
    }

    #[test]
    fn missing_files_are_reported() {
        let paths = TlsPaths {
            cert: "/nonexistent/seal/tls.crt",
            key: "/nonexistent/seal/tls.key",
        };
        let Err(err) = load_acceptor(&paths) else {
            panic!("missing certificate files must not yield an acceptor");
        };
        assert!(err.to_string().contains("tls.crt"));
    }
}
