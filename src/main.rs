use anyhow::{Context, Result};
use clap::Parser;
use prepcall::transport::TransportKind;
use prepcall::{AppState, Config, HttpBackend, SessionTiming};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "prepcall", about = "Interview call session service")]
struct Cli {
    /// Config file (TOML), merged with PREPCALL_* environment overrides
    #[arg(long, default_value = "config/prepcall")]
    config: String,

    /// Override the configured bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the configured port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} starting", cfg.service.name);

    let backend = Arc::new(HttpBackend::new(&cfg.backend)?);
    let timing = SessionTiming::from_config(&cfg.session);

    info!(
        "Session thresholds: min {}ms, credit grace {}ms, settle {}ms",
        cfg.session.min_interview_ms, cfg.session.credit_restore_grace_ms, cfg.session.settle_delay_ms
    );

    let ws_url = cfg
        .transport
        .ws_url
        .clone()
        .context("transport.ws_url is required to reach the voice vendor")?;

    let capture_dir = cfg.audio.capture_dir.as_ref().map(std::path::PathBuf::from);
    if let Some(dir) = &capture_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create capture directory {:?}", dir))?;
    }

    let state = AppState::new(backend, timing, TransportKind::Vendor { ws_url })
        .with_capture_dir(capture_dir);
    let app = prepcall::create_router(state);

    let bind = cli.bind.unwrap_or(cfg.service.http.bind);
    let port = cli.port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", bind, port);

    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app).await?;

    Ok(())
}
