//! HTTP prediction service binary
//!
//! Loads the persisted artifacts once and serves predictions until stopped.

use anyhow::{Context, Result};
use clap::Parser;
use fake_news_ml::pipeline::ArtifactSet;
use fake_news_ml::server::{self, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "serve", about = "Serve fake news predictions over HTTP")]
struct Args {
    /// Directory holding the trained artifacts
    #[arg(long, default_value = "artifacts")]
    artifacts_dir: PathBuf,

    /// Listen host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Listen port
    #[arg(long, default_value_t = 5000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let artifacts = ArtifactSet::load(&args.artifacts_dir).context("loading artifacts")?;
    let app = server::router(AppState::new(artifacts));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("invalid listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!(%addr, "prediction service listening");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
