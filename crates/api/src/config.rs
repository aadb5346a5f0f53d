//! Server configuration

use inference_engine::USER_CERTAINTY;
use serde::{Deserialize, Serialize};
use storage::DEFAULT_HISTORY_CAPACITY;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Inference engine configuration
    #[serde(default)]
    pub engine: EngineSettings,

    /// Diagnosis history configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            enable_cors: true,
        }
    }
}

/// Inference engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Certainty assigned to each reported symptom
    #[serde(default = "default_user_certainty")]
    pub user_certainty: f64,

    /// JSON rule table replacing the built-in knowledge base
    #[serde(default)]
    pub knowledge_base_path: Option<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            user_certainty: USER_CERTAINTY,
            knowledge_base_path: None,
        }
    }
}

/// Diagnosis history settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Sessions retained
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,

    /// JSON file mirroring the history; in-memory only when unset
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
            file: None,
        }
    }
}

/// Rate limiting settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Apply per-IP rate limiting
    #[serde(default)]
    pub enabled: bool,

    /// Seconds to replenish one request
    #[serde(default = "default_per_second")]
    pub per_second: u64,

    /// Requests allowed in a burst
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            per_second: default_per_second(),
            burst_size: default_burst_size(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_user_certainty() -> f64 {
    USER_CERTAINTY
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_per_second() -> u64 {
    2
}

fn default_burst_size() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration: defaults, then an optional file, then `PCDIAG_*`
    /// environment variables (`__` separates nested keys, e.g.
    /// `PCDIAG_ENGINE__USER_CERTAINTY`).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("PCDIAG")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
