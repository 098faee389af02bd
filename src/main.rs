use anyhow::Context;

use fazenda_api::config::AppConfig;
use fazenda_api::routes::app;
use fazenda_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATA_SERVICE_URL and keys.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Configuration is read exactly once; a missing URL or credential is a
    // fatal startup error, never retried.
    let config = AppConfig::from_env().context("configuration error")?;
    tracing::info!("Starting fazenda API in {:?} mode", config.environment);

    let state = AppState::new(config);
    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("FAZENDA_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("fazenda API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
