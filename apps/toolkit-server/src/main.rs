//! PDF Toolkit Server
//!
//! Thin HTTP adapter over `pdf-toolkit-core`. Provides REST API endpoints for:
//!
//! - Merging PDFs and images into one PDF with a table of contents
//! - Converting an image to a Letter-size PDF
//! - Splitting a PDF by page ranges into a ZIP archive
//! - Rotating every page of a PDF
//!
//! Documents travel base64-encoded inside JSON bodies. Nothing is written to
//! disk; each request is handled entirely in memory on the blocking pool.

use std::net::SocketAddr;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;

use api::{handle_convert, handle_health, handle_merge, handle_rotate, handle_split};

/// Command-line arguments for the toolkit server
#[derive(Parser, Debug)]
#[command(name = "pdf-toolkit-server")]
#[command(about = "HTTP server for merging, splitting, converting and rotating PDFs")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Maximum request body size in megabytes
    #[arg(long, default_value = "100")]
    max_body_mb: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Build the application router with all routes and middleware
pub fn build_router(max_body_bytes: usize) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // API endpoints
        .route("/api/merge", post(handle_merge))
        .route("/api/convert", post(handle_convert))
        .route("/api/split", post(handle_split))
        .route("/api/rotate", post(handle_rotate))
        // Apply middleware
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PDF toolkit server on {}:{}", args.host, args.port);

    let app = build_router(args.max_body_mb * 1024 * 1024);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Max request body: {} MB", args.max_body_mb);

    axum::serve(listener, app).await?;

    Ok(())
}
