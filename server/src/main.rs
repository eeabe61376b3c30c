use anyhow::Result;
use axum::Router;
use clap::Parser;
use hotspot_core::AnalysisConfig;
use server::{build_app, ServerOptions, DEFAULT_MAX_KEYWORDS_CAP};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Venue allow-list file (one per line or comma separated)
    #[arg(long)]
    venues: Option<PathBuf>,
    /// JSON analysis config
    #[arg(long)]
    config: Option<PathBuf>,
    /// Largest vocabulary a request may ask for
    #[arg(long, default_value_t = DEFAULT_MAX_KEYWORDS_CAP)]
    max_keywords_cap: usize,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = match &args.config {
        Some(p) => AnalysisConfig::load(p)?,
        None => AnalysisConfig::default(),
    };
    let app: Router = build_app(ServerOptions {
        venues: args.venues.as_deref(),
        config,
        max_keywords_cap: args.max_keywords_cap,
    })?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
