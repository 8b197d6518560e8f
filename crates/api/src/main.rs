use anyhow::{Context, Result};

use api::{AppConfig, AppState, init_tracing, router};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    let state = AppState::new(&config)?;
    let app = router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        cache = config.cache.enabled,
        layout = %config.visual.layout,
        "Server listening on http://{}",
        addr
    );

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
