//! HTTP routes over the dictionary

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    middleware as axum_mw,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::AppState;
use super::error::ApiError;
use super::middleware::{log_requests, require_bearer};
use crate::validation::validate_entry;

#[derive(Debug, Deserialize, Serialize)]
pub struct AddRequest {
    pub word: String,
    pub definition: String,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct DefinitionResponse {
    pub word: String,
    pub definition: String,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct ListResponse {
    pub words: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub words: usize,
}

/// Build the router: dictionary routes behind bearer auth, `/health` open
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/add", post(add_entry))
        .route("/get/:word", get(get_definition))
        .route("/remove/:word", delete(remove_entry))
        .route("/list", get(list_words))
        .route_layer(axum_mw::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .layer(axum_mw::from_fn(log_requests))
        .with_state(state)
}

async fn add_entry(
    State(state): State<AppState>,
    payload: Result<Json<AddRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(entry) = payload.map_err(|e| {
        warn!("Invalid request body: {}", e);
        ApiError::bad_request("Invalid request body")
    })?;

    let word = entry.word.trim();
    let definition = entry.definition.trim();
    validate_entry(word, definition)
        .map_err(|e| ApiError::bad_request(format!("Error validating data: {}", e)))?;

    debug!("Adding word '{}'", word);
    let message = state.dictionary.add(word, definition).await?;
    Ok(Json(MessageResponse { message }))
}

async fn get_definition(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Result<Json<DefinitionResponse>, ApiError> {
    let entry = state.dictionary.get(&word)?;
    Ok(Json(DefinitionResponse {
        word,
        definition: entry.definition,
    }))
}

async fn remove_entry(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state.dictionary.remove(&word).await?;
    Ok(Json(MessageResponse { message }))
}

async fn list_words(State(state): State<AppState>) -> Json<ListResponse> {
    let (mut words, _) = state.dictionary.list();
    words.sort();
    Json(ListResponse { words })
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        words: state.dictionary.len(),
    })
}
