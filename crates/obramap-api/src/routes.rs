use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use obramap_core::models::Obra;
use obramap_ingest::{GovClient, IngestPipeline};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters of the ingestion trigger; names match the public
/// contract (`minPages`/`maxPages`), defaults come from configuration.
#[derive(Debug, Deserialize)]
pub struct PopulateParams {
    #[serde(rename = "minPages")]
    pub min_pages: Option<u32>,
    #[serde(rename = "maxPages")]
    pub max_pages: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PopulateResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ObrasResponse {
    pub obras: Vec<Obra>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/populate", get(handle_populate))
        .route("/api/v1/obras", get(handle_list_obras))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "obramap-api"
    }))
}

async fn handle_populate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PopulateParams>,
) -> Result<impl IntoResponse, ApiError> {
    let min_pages = params.min_pages.unwrap_or(state.config.min_pages.value);
    let max_pages = params.max_pages.unwrap_or(state.config.max_pages.value);

    if min_pages == 0 || max_pages < min_pages {
        return Err(ApiError::bad_request("Invalid page range")
            .with_details(format!("minPages={}, maxPages={}", min_pages, max_pages)));
    }

    tracing::info!(min_pages, max_pages, "Populate triggered");

    let mut client =
        GovClient::new(state.config.gov_api_url.value.clone(), state.config.uf.value.clone());
    if let Some(key) = &state.config.api_key.value {
        client = client.with_api_key(key.clone());
    }

    let pipeline = IngestPipeline::new(client, state.store.clone());
    let summary = pipeline.run(min_pages, max_pages).await.map_err(|e| {
        tracing::error!(error = %e, "Ingestion pass failed");
        ApiError::internal("Failed to insert data").with_details(e.to_string())
    })?;

    tracing::info!(
        pages_fetched = summary.pages_fetched,
        pages_skipped = summary.pages_skipped,
        obras_upserted = summary.obras_upserted,
        "Ingestion pass finished"
    );

    Ok(Json(PopulateResponse {
        message: format!("Fetched & upserted up to page {} successfully!", max_pages),
    }))
}

async fn handle_list_obras(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let obras = state.store.list_obras().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list obras");
        ApiError::internal("Failed to fetch data").with_details(e.to_string())
    })?;

    Ok(Json(ObrasResponse { obras }))
}
