use axum::{Json, extract::State};
use std::sync::Arc;
use crate::error::DiagnosticError;
use crate::generator::{GenerationParams, GeneratorError};
use crate::models::{
    ApiTestResponse, ModelListResponse, StatusResponse, StoreTestResponse, ViewDbResponse,
};
use crate::state::AppState;

pub const SMOKE_TEST_PROMPT: &str = "What is 2+2? Answer in one sentence.";
pub const SAMPLE_LIMIT: usize = 3;
pub const VIEW_LIMIT: usize = 50;

// Generator smoke test with a fixed prompt
pub async fn test_api_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiTestResponse>, DiagnosticError> {
    if !state.generator.has_api_key() {
        return Err(GeneratorError::MissingApiKey.into());
    }
    let response = state
        .generator
        .generate(SMOKE_TEST_PROMPT, GenerationParams::default())
        .await?;

    Ok(Json(ApiTestResponse {
        status: "success",
        response,
        message: "Gemini API is working!".to_string(),
        model: state.generator.model().to_string(),
    }))
}

pub async fn test_store_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StoreTestResponse>, DiagnosticError> {
    state.store.ping().await?;
    let documents = state.store.count().await?;
    let sample = state.store.list(SAMPLE_LIMIT).await?;

    Ok(Json(StoreTestResponse {
        status: "success",
        message: format!("{} store connected", state.store.backend()),
        documents,
        sample,
    }))
}

pub async fn view_db_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ViewDbResponse>, DiagnosticError> {
    let data = state.store.list(VIEW_LIMIT).await?;
    let total = state.store.count().await?;
    Ok(Json(ViewDbResponse { total, data }))
}

pub async fn clear_db_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, DiagnosticError> {
    let deleted = state.store.clear().await?;
    tracing::info!(deleted, "store cleared");
    Ok(Json(StatusResponse {
        status: "success",
        message: format!("Deleted {deleted} records"),
    }))
}

pub async fn list_models_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ModelListResponse>, DiagnosticError> {
    let available_models = state.generator.list_models().await?;
    Ok(Json(ModelListResponse {
        status: "success",
        available_models,
    }))
}
