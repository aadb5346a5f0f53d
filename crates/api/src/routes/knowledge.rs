//! Knowledge Base Routes

use axum::{extract::State, Json};
use knowledge_base::Rule;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::AppState;

/// Response for symptoms endpoint
#[derive(Debug, Serialize)]
pub struct SymptomResponse {
    pub data: Vec<String>,
    pub count: usize,
}

/// Response for rules endpoint
#[derive(Debug, Serialize)]
pub struct RuleResponse {
    pub data: Vec<Rule>,
    pub count: usize,
}

/// List every selectable symptom, sorted
pub async fn get_symptoms(State(state): State<Arc<RwLock<AppState>>>) -> Json<SymptomResponse> {
    let state = state.read().await;
    let data = state.engine.knowledge_base().all_symptom_names();

    Json(SymptomResponse {
        count: data.len(),
        data,
    })
}

/// List rules in declaration order
pub async fn get_rules(State(state): State<Arc<RwLock<AppState>>>) -> Json<RuleResponse> {
    let state = state.read().await;
    let data = state.engine.knowledge_base().all_rules().to_vec();

    Json(RuleResponse {
        count: data.len(),
        data,
    })
}
