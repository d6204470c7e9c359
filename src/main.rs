use anyhow::{Context, Result};
use medconsult_relay::{config::Config, routes, state::AppState};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when the variables come from the environment)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medconsult_relay=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!("Starting Medical Consultation API");

    // Load configuration from environment
    let config = Config::from_env()?;

    if !config.twilio_configured() {
        warn!("TWILIO_ACCOUNT_SID / TWILIO_AUTH_TOKEN not set, SMS endpoints will fail");
    }
    if !config.sarvam_configured() {
        warn!("SARVAM_API_KEY not set, translation endpoints will fail");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config)?;
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
