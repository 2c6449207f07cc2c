//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::analysis::RunContinuity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Largest accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// External summary generator configuration
///
/// Any OpenAI-compatible chat completions endpoint works; the defaults
/// target Cerebras.
#[derive(Clone, Deserialize, Serialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_generator_enabled")]
    pub enabled: bool,

    /// Base URL; `/v1/chat/completions` is appended
    #[serde(default = "default_generator_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Bearer token; requests fail with missing credentials when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_generator_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_generator_enabled() -> bool {
    true
}

fn default_generator_url() -> String {
    "https://api.cerebras.ai".to_string()
}

fn default_model() -> String {
    "llama3.1-8b".to_string()
}

fn default_generator_timeout() -> u64 {
    10_000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: default_generator_enabled(),
            base_url: default_generator_url(),
            model: default_model(),
            api_key: None,
            request_timeout_ms: default_generator_timeout(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

// Keeps the API key out of logs
impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("enabled", &self.enabled)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Analysis engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Entries required before patterns are analysed
    #[serde(default = "default_min_entries")]
    pub min_entries: usize,

    /// Days of history analysed per request
    #[serde(default = "default_window_days")]
    pub window_days: i64,

    #[serde(default)]
    pub continuity: RunContinuity,
}

fn default_min_entries() -> usize {
    7
}

fn default_window_days() -> i64 {
    30
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_entries: default_min_entries(),
            window_days: default_window_days(),
            continuity: RunContinuity::default(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("moodlens").join("config.toml")),
            Some(PathBuf::from("/etc/moodlens/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; unparsable numbers are ignored
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(host) = var("MOODLENS_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("MOODLENS_API_PORT").and_then(|p| p.parse().ok()) {
            self.api.port = port;
        }

        // Generator overrides
        if let Some(url) = var("MOODLENS_GENERATOR_URL") {
            self.generator.base_url = url;
        }
        if let Some(timeout) = var("MOODLENS_GENERATOR_TIMEOUT_MS").and_then(|t| t.parse().ok()) {
            self.generator.request_timeout_ms = timeout;
        }
        if let Some(key) = var("CEREBRAS_API_KEY").filter(|k| !k.is_empty()) {
            self.generator.api_key = Some(key);
        }
        if let Some(model) = var("CEREBRAS_MODEL") {
            self.generator.model = model;
        }

        // Logging overrides
        if let Some(level) = var("MOODLENS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("MOODLENS_LOG_FORMAT").and_then(|f| f.parse().ok()) {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Moodlens Configuration
#
# Environment variables override these settings:
# - MOODLENS_API_HOST
# - MOODLENS_API_PORT
# - MOODLENS_GENERATOR_URL
# - MOODLENS_GENERATOR_TIMEOUT_MS
# - CEREBRAS_API_KEY
# - CEREBRAS_MODEL
# - MOODLENS_LOG_LEVEL
# - MOODLENS_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 5000

# Allowed CORS origins (empty allows any origin)
cors_origins = []

# Largest accepted request body (bytes)
max_body_bytes = 65536

[generator]
# Use the external summary generator when a key is configured
enabled = true

# OpenAI-compatible endpoint base URL
base_url = "https://api.cerebras.ai"

# Model name
model = "llama3.1-8b"

# API key (prefer the CEREBRAS_API_KEY environment variable)
# api_key = ""

# Per-request timeout (ms)
request_timeout_ms = 10000

# Sampling temperature
temperature = 0.7

# Token limit for pattern summaries
max_tokens = 500

[analysis]
# Entries required before patterns are analysed
min_entries = 7

# Days of history analysed per request
window_days = 30

# Run continuity: calendar_days (gaps break runs) or entry_order
continuity = "calendar_days"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_template_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();

        assert_eq!(config.api.port, 5000);
        assert_eq!(config.generator.model, "llama3.1-8b");
        assert!(config.generator.api_key.is_none());
        assert_eq!(config.analysis.min_entries, 7);
        assert_eq!(config.analysis.window_days, 30);
        assert_eq!(config.analysis.continuity, RunContinuity::CalendarDays);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\ncontinuity = \"entry_order\"\n\n[logging]\nformat = \"json\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.analysis.continuity, RunContinuity::EntryOrder);
        assert_eq!(config.analysis.min_entries, 7);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.api.host, "0.0.0.0");
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load(Path::new("/nonexistent/moodlens.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nport = \"not a number\"").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MOODLENS_API_PORT", "9000"),
            ("MOODLENS_LOG_FORMAT", "JSON"),
            ("CEREBRAS_API_KEY", "secret"),
            ("CEREBRAS_MODEL", "llama-3.3-70b"),
            ("MOODLENS_GENERATOR_TIMEOUT_MS", "soon"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.port, 9000);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.generator.api_key.as_deref(), Some("secret"));
        assert_eq!(config.generator.model, "llama-3.3-70b");
        assert_eq!(config.generator.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = GeneratorConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
