use std::env;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use obramap_core::config::LayeredConfig;
use obramap_store::{MemoryObraStore, ObraStore, PostgresObraStore};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use obramap_api::routes::create_router;
use obramap_api::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "obramap_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = LayeredConfig::with_defaults();
    if let Ok(path) = env::var("OBRAMAP_CONFIG") {
        config = match config.load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(path = %path, error = %e, "Failed to load config file");
                std::process::exit(1);
            }
        };
    }
    let config = config.load_from_env();

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    }

    let port = config.port.value;

    tracing::info!(
        port = port,
        uf = %config.uf.value,
        gov_api_url = %config.gov_api_url.value,
        "Starting obramap API server"
    );

    // Storage backend: PostgreSQL when DATABASE_URL is set, in-memory otherwise
    let store: Arc<dyn ObraStore> = match env::var("DATABASE_URL") {
        Ok(database_url) => {
            tracing::info!("DATABASE_URL found, connecting to PostgreSQL...");
            match PostgresObraStore::with_schema(&database_url).await {
                Ok(store) => {
                    tracing::info!("Connected to PostgreSQL");
                    Arc::new(store)
                }
                Err(e) => {
                    tracing::error!("Failed to connect to PostgreSQL: {}", e);
                    tracing::error!(
                        "Remediation:\n\
                        1. Ensure PostgreSQL is running\n\
                        2. Verify DATABASE_URL is correct\n\
                        3. Check that the database exists and is accessible"
                    );
                    std::process::exit(1);
                }
            }
        }
        Err(_) => {
            tracing::info!("Using in-memory storage (set DATABASE_URL for PostgreSQL)");
            Arc::new(MemoryObraStore::new())
        }
    };

    let state = Arc::new(AppState::new(store, config));

    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = create_router(state).layer(cors);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.unwrap();
}
