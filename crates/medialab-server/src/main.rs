use std::sync::Arc;

use medialab_server::{app_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Only load .env in development; production uses platform-native env injection.
    #[cfg(debug_assertions)]
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medialab_server=info".parse()?)
                .add_directive("medialab_core=info".parse()?),
        )
        .init();

    let config = Arc::new(ServerConfig::from_env()?);
    tracing::info!("Starting medialab-server with config: {:?}", config);

    let state = AppState::from_config(config);
    let bind_addr = state.config.bind_addr.clone();
    let router = app_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("medialab-server listening on {}", bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
