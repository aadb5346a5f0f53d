//! PC Fault Diagnosis API Server
//!
//! REST API offering the symptom catalogue, certainty factor diagnosis and
//! the bounded diagnosis history.

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use inference_engine::{EngineConfig, InferenceEngine};
use knowledge_base::KnowledgeBase;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use storage::HistoryStore;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod error;
pub mod rate_limit;
pub mod routes;

pub use crate::config::AppConfig;
pub use error::ApiError;

use crate::config::LoggingConfig;

/// Application state shared across handlers
pub struct AppState {
    /// Inference engine over the loaded knowledge base
    pub engine: InferenceEngine,
    /// Diagnosis history, shared with blocking file writes
    pub history: Arc<HistoryStore>,
    /// Prometheus handle, when the exporter is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(engine: InferenceEngine, history: HistoryStore) -> Self {
        Self {
            engine,
            history: Arc::new(history),
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Build state from configuration, loading the knowledge base and history
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let knowledge_base = match &config.engine.knowledge_base_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading knowledge base {}", path))?;
                KnowledgeBase::from_json(&json)
                    .with_context(|| format!("loading knowledge base {}", path))?
            }
            None => KnowledgeBase::builtin(),
        };

        let engine = InferenceEngine::with_config(
            Arc::new(knowledge_base),
            EngineConfig {
                user_certainty: config.engine.user_certainty,
            },
        )?;

        if config.history.capacity == 0 {
            anyhow::bail!("history capacity must be at least 1");
        }

        let history = match &config.history.file {
            Some(path) => HistoryStore::with_file(path, config.history.capacity)
                .with_context(|| format!("opening history file {}", path))?,
            None => HistoryStore::new(config.history.capacity),
        };

        Ok(Self::new(engine, history))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            InferenceEngine::new(Arc::new(KnowledgeBase::builtin())),
            HistoryStore::default(),
        )
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
    pub metrics: SystemMetrics,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub knowledge_base: ComponentHealth,
    pub inference: ComponentHealth,
    pub history: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
}

impl ComponentHealth {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// System metrics
#[derive(Debug, Serialize)]
pub struct SystemMetrics {
    pub rule_count: usize,
    pub symptom_count: usize,
    pub history_count: usize,
}

/// Create the application router
pub fn create_router(state: Arc<RwLock<AppState>>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/symptoms", get(routes::knowledge::get_symptoms))
        .route("/api/v1/rules", get(routes::knowledge::get_rules))
        .route("/api/v1/diagnose", post(routes::diagnose::post_diagnose))
        .route(
            "/api/v1/history",
            get(routes::history::get_history).delete(routes::history::clear_history),
        )
        .route("/api/v1/history/:id", get(routes::history::get_session))
        .route("/metrics", get(metrics_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    let state = state.read().await;
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let knowledge_base = state.engine.knowledge_base();

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus {
            knowledge_base: ComponentHealth::ok(),
            inference: ComponentHealth::ok(),
            history: ComponentHealth::ok(),
        },
        metrics: SystemMetrics {
            rule_count: knowledge_base.len(),
            symptom_count: knowledge_base.all_symptom_names().len(),
            history_count: state.history.len(),
        },
    };

    Json(response)
}

/// Prometheus exposition handler
async fn metrics_handler(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    let state = state.read().await;
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::NOT_FOUND,
            "metrics exporter not installed".to_string(),
        ),
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level: Level = config.level.parse().unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    Ok(())
}

/// Run the server
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let mut state = AppState::from_config(&config)?;

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state.metrics = Some(handle),
        Err(e) => warn!("Prometheus exporter not installed: {}", e),
    }

    let state = Arc::new(RwLock::new(state));
    let mut app = create_router(state);

    if config.server.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    if config.rate_limit.enabled {
        let governor = rate_limit::create_governor_config(&config.rate_limit)
            .context("rate limit per_second and burst_size must be non-zero")?;
        info!(
            "Rate limiting enabled: per_second={}, burst={}",
            config.rate_limit.per_second, config.rate_limit.burst_size
        );
        app = app.layer(GovernorLayer { config: governor });
    }

    info!("Starting API server on {}", config.server.listen_addr);

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
