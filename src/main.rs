use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use velora_planner::config::AppConfig;
use velora_planner::db;
use velora_planner::server;
use velora_planner::state::AppState;
use velora_planner::storage::{Persistence, SqliteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let store = SqliteStore::new(Arc::new(Mutex::new(conn)));
    let persistence = Persistence::new(store, config.storage_namespace.clone());

    if !config.static_dir.join("index.html").exists() {
        tracing::warn!(
            "no index.html in {}, only /health will respond",
            config.static_dir.display()
        );
    }

    let state = Arc::new(AppState {
        persistence,
        config: config.clone(),
    });

    let app = server::build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("serving {} on {addr}", config.static_dir.display());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
