//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::analysis::PatternAnalysisEngine;
use crate::entries::EntryStore;
use crate::generator::SummaryGenerator;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Per-user entry storage
    pub store: Arc<dyn EntryStore>,
    /// Stateless analysis engine
    pub engine: Arc<PatternAnalysisEngine>,
    /// External summary generator (optional)
    pub generator: Option<Arc<dyn SummaryGenerator>>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState without an external generator
    pub fn new(store: Arc<dyn EntryStore>, engine: Arc<PatternAnalysisEngine>, config: ApiConfig) -> Self {
        Self {
            store,
            engine,
            generator: None,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Attach an external summary generator
    pub fn with_generator(mut self, generator: Arc<dyn SummaryGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Check if an external generator is configured
    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Days of history analysed when a request names none
    pub window_days: i64,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_body_size: 64 * 1024,
            window_days: 30,
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Build from the loaded configuration file
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            host: config.api.host.clone(),
            port: config.api.port,
            max_body_size: config.api.max_body_bytes,
            window_days: config.analysis.window_days,
            cors_origins: config.api.cors_origins.clone(),
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
