//! Diagnosis Routes

use axum::{extract::State, Json};
use inference_engine::{DiagnosisResult, ObservedSymptoms};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::DiagnosisSession;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::AppState;

/// Request body for diagnose endpoint
#[derive(Debug, Deserialize)]
pub struct DiagnoseRequest {
    /// Selected symptom names
    #[serde(default)]
    pub symptoms: Vec<String>,
}

/// Bar chart point keyed by rule name
#[derive(Debug, Serialize)]
pub struct ChartEntry {
    pub rule_name: String,
    pub confidence_percent: u8,
}

impl From<&DiagnosisResult> for ChartEntry {
    fn from(result: &DiagnosisResult) -> Self {
        Self {
            rule_name: result.rule_name.clone(),
            confidence_percent: result.confidence_percent,
        }
    }
}

/// Response for diagnose endpoint
#[derive(Debug, Serialize)]
pub struct DiagnoseResponse {
    pub session: DiagnosisSession,
    pub chart: Vec<ChartEntry>,
}

/// Run a diagnosis and record it in history
pub async fn post_diagnose(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(request): Json<DiagnoseRequest>,
) -> Result<Json<DiagnoseResponse>, ApiError> {
    if request.symptoms.is_empty() {
        return Err(ApiError::BadRequest(
            "select at least one symptom".to_string(),
        ));
    }

    let (results, history) = {
        let state = state.read().await;
        let observed: ObservedSymptoms = request.symptoms.iter().cloned().collect();
        (state.engine.diagnose(&observed), state.history.clone())
    };

    metrics::counter!("diagnoses_total").increment(1);
    metrics::histogram!("diagnosis_result_count").record(results.len() as f64);
    if results.is_empty() {
        metrics::counter!("diagnoses_empty_total").increment(1);
    }

    let chart = results.iter().map(ChartEntry::from).collect();
    let session = DiagnosisSession::new(request.symptoms, results);
    debug!("Diagnosis {}: {} results", session.id, session.results.len());

    // History is best effort; the diagnosis itself is still returned
    let id = session.id;
    let recorded = session.clone();
    match tokio::task::spawn_blocking(move || history.record(recorded)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Failed to record diagnosis {}: {}", id, e),
        Err(e) => warn!("History task for diagnosis {} failed: {}", id, e),
    }

    Ok(Json(DiagnoseResponse { session, chart }))
}
