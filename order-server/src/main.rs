use order_server::{AppState, Config, api};
use shared::{CloudConfig, SupabaseClient};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_server=info,shared=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env();
    let cloud = SupabaseClient::new(CloudConfig::from_env()?)?;

    tracing::info!(
        orders_path = %config.orders_path.display(),
        paper_width = config.paper_width,
        "Starting order-server"
    );

    let state = AppState::new(&config, Arc::new(cloud));
    let app = api::router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("order-server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("order-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
