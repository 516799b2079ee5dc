//! Axum HTTP(S) server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Map sealing errors onto HTTP responses without leaking secrets.
//! - Serve the router over plain TCP or a rustls TLS listener.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
pub mod tls;
