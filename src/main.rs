//! plainlog demo server.
//!
//! Serves a few routes behind [`RequestLogLayer`] so the request lines can
//! be seen in both modes. Run it once plain and once with `LOG_DEBUG=1`:
//! plain mode only shows the `/fail` requests, debug mode shows everything
//! except the health checks.

mod config;
mod logging;

use anyhow::Context;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use clap::Parser;
use plainlog::RequestLogLayer;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;

use crate::config::{Args, SLOW_ROUTE_DELAY_MS};

#[tokio::main]
async fn main() {
    logging::init_logging();

    let args = Args::parse();
    if let Err(err) = run(args).await {
        plainlog::die(err);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    plainlog::rename(&args.name);

    let addr: SocketAddr = args
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {:?}", args.bind))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    plainlog::infof!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(args.log_all))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server stopped unexpectedly")?;
    plainlog::info!("shut down");
    Ok(())
}

fn app(log_all: bool) -> Router {
    let request_log = if log_all {
        RequestLogLayer::new()
    } else {
        RequestLogLayer::new().default_blacklist()
    };

    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/ping", get(|| async { "pong" }))
        .route("/healthz", get(|| async { StatusCode::OK }))
        .route(
            "/fail",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "unavailable") }),
        )
        .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
        .route("/slow", get(slow))
        .layer(request_log)
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_millis(SLOW_ROUTE_DELAY_MS)).await;
    "done"
}

/// 等待 Ctrl+C 或 SIGTERM，用于优雅停机。
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    plainlog::info!("received termination signal, shutting down");
}
