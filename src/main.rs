use anyhow::Result;
use keygate::create_router;
use std::env;
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present, then initialize tracing to stdout
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::try_init().ok();

    info!("Starting keygate server...");

    let app = create_router().await?;

    // Get optional bind endpoint from environment
    let endpoint = env::var("KEYGATE_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    info!("Starting at endpoint:{}", endpoint);
    info!("Starting Keygate API server v{}...", env!("CARGO_PKG_VERSION"));

    let listener = tokio::net::TcpListener::bind(&endpoint).await?;

    // ConnectInfo supplies the peer address the login webhook may report.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
