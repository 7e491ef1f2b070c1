// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Admin Request Guard Service
//!
//! Fronts the admin API with rate limiting, origin and content-type checks,
//! payload sanitization and security headers.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RATE_LIMIT_MAX_REQUESTS`: Requests per window per client (default: 100)
//! - `RATE_LIMIT_WINDOW_MS`: Window length in milliseconds (default: 60000)
//! - `ALLOWED_ORIGINS`: Comma separated CORS origins
//! - `ADMIN_ALLOWED_IPS`: Comma separated client allow-list (default: open)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use admin_guard::{config::Config, handlers::{router, AppState}};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = Config::from_env();
    info!(
        bind_addr = %config.bind_addr,
        max_requests = config.rate_limit.max_requests,
        window_ms = config.rate_limit.window_ms,
        allowed_origins = ?config.cors.allowed_origins,
        ip_allow_list = !config.access.allowed_ips.is_empty(),
        "Starting admin guard"
    );

    let addr: SocketAddr = config.bind_addr.parse()?;
    let state = Arc::new(AppState::new(config)?);

    let sweeper = state.guard.limiter().spawn_sweeper();
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.shutdown().await;
    info!("Admin guard stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
