//! History Routes

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::DiagnosisSession;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

/// Query parameters for history endpoint
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of sessions
    pub limit: Option<usize>,
}

/// Response for history endpoint
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub data: Vec<DiagnosisSession>,
    pub count: usize,
}

/// Response for clearing history
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: usize,
}

/// Get recorded sessions, newest first
pub async fn get_history(
    State(state): State<Arc<RwLock<AppState>>>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let state = state.read().await;
    let capacity = state.history.capacity();
    let limit = params.limit.unwrap_or(capacity).min(capacity);

    let data = state.history.list(limit)?;

    Ok(Json(HistoryResponse {
        count: data.len(),
        data,
    }))
}

/// Get one recorded session by id
pub async fn get_session(
    State(state): State<Arc<RwLock<AppState>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DiagnosisSession>, ApiError> {
    let state = state.read().await;

    state
        .history
        .get(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("session {} not found", id)))
}

/// Delete every recorded session
pub async fn clear_history(
    State(state): State<Arc<RwLock<AppState>>>,
) -> Result<Json<ClearResponse>, ApiError> {
    let history = state.read().await.history.clone();

    let cleared = tokio::task::spawn_blocking(move || history.clear())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(ClearResponse { cleared }))
}
