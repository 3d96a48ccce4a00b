use payment_search::{
    api::{build_router, AppState},
    config::Config,
    gateway::HttpGateway,
    schema::payments_schema,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "payment_search={},tower_http=info",
            config.observability.log_level
        )
        .into()
    });

    if config.observability.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting payment search v{}", env!("CARGO_PKG_VERSION"));

    // A malformed schema is fatal at startup, never a per-query failure.
    let schema = payments_schema();
    schema.validate()?;
    tracing::info!(version = schema.version, "Index schema validated");

    let gateway = Arc::new(HttpGateway::new(&config.gateway)?);
    tracing::info!(engine_url = %config.gateway.engine_url, "Retrieval gateway initialized");

    let app_state = AppState::new(
        Arc::new(schema.clone()),
        gateway,
        config.search.clone(),
    );

    let app = build_router(app_state);

    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("HTTP API server listening on http://{}", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);
    tracing::info!("   REST API: http://{}/api/payments", http_addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                tracing::error!("HTTP server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down gracefully...");
    Ok(())
}
