use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use foodscan::api::{create_router, AppState};
use foodscan::config::Config;
use foodscan::db::{Database, DatabaseBackend, LibSqlBackend};
use foodscan::llm::{LlmProvider, VisionModel};

#[derive(Parser)]
#[command(name = "foodscan")]
#[command(about = "Food photo allergen analysis service")]
struct Args {
    /// Address to bind, overriding FOODSCAN_HOST
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overriding FOODSCAN_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foodscan=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Initializing database...");
    let raw_db = Database::new(&config.database).await?;
    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));
    db.sync().await?;

    tracing::info!("Configuring vision model: {}...", config.llm.model);
    let provider = LlmProvider::new(&config.llm);
    if !provider.is_available() {
        tracing::warn!(
            "Vision model is unavailable; /identify will answer with an error until LLM_MODEL and LLM_API_KEY are set"
        );
    }
    let model: Arc<dyn VisionModel> = Arc::new(provider);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, db, model);
    let app = create_router(state);

    tracing::info!("Foodscan starting on http://{}", addr);
    tracing::info!("  Identify:     http://{}/identify", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Foodscan stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests...");
}
