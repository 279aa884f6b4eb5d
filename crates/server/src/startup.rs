use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};
use service::{parents::ParentStore, runtime};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8081);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Resolve the data directory from configs or the DATA_DIR env var.
fn load_data_dir() -> String {
    match configs::load_default() {
        Ok(cfg) => cfg.storage.data_dir,
        Err(_) => env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let data_dir = load_data_dir();
    runtime::ensure_env(&data_dir).await?;

    // Parent collection, persisted under the data directory
    let store_path: PathBuf = [data_dir.as_str(), "parents.json"].iter().collect();
    let parent_store = ParentStore::new(store_path)
        .await
        .map_err(|e| anyhow::anyhow!("cannot open parent store: {e}"))?;

    let state = ServerState { parent_store: Arc::clone(&parent_store) };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(state, cors);

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, "starting parent registry server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
