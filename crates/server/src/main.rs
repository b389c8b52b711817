mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use track_snap::Catalog;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let catalog_dir =
        PathBuf::from(std::env::var("CATALOG_DIR").unwrap_or_else(|_| "data".to_string()));
    let catalog = match Catalog::load(&catalog_dir) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load catalog from {}: {e}", catalog_dir.display());
            std::process::exit(1);
        }
    };
    tracing::info!("Serving {} track pieces", catalog.len());

    let state = AppState {
        catalog: Arc::new(catalog),
    };

    let app = Router::new()
        .merge(routes::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {bind_addr}: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("Listening on {bind_addr}");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {e}");
    }
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}
