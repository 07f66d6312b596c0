use anyhow::Context as _;
use tracing::info;

use campus_core::config::Config;
use campus_core::tracing::init_tracing;

use campus_market::config::MarketConfig;
use campus_market::router::build_router;
use campus_market::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info,campus_market=debug");

    let config = MarketConfig::from_env().context("read market configuration")?;
    info!(data_dir = %config.data_dir.display(), "opening data directory");
    let state = AppState::open(&config);

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.market_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!("market service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("market service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
