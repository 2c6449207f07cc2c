//! Moodlens API Server
//!
//! Run with: cargo run --bin moodlens-api
//!
//! # Configuration
//!
//! Read from `config.toml` (see `moodlens config`), then overridden by:
//! - `MOODLENS_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `MOODLENS_API_PORT`: Port to listen on (default: 5000)
//! - `CEREBRAS_API_KEY`: Enables the external summary generator
//! - `CEREBRAS_MODEL`: Model used for summaries (default: llama3.1-8b)
//! - `MOODLENS_GENERATOR_URL`: Chat completions base URL
//! - `MOODLENS_LOG_LEVEL` / `MOODLENS_LOG_FORMAT`: Logging (pretty or json)
//! - `RUST_LOG`: Overrides the log filter entirely

use anyhow::Context;
use moodlens::analysis::{EngineConfig, PatternAnalysisEngine};
use moodlens::api::{serve, ApiConfig, AppState};
use moodlens::config::Config;
use moodlens::entries::MemoryEntryStore;
use moodlens::generator::ChatCompletionsClient;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();

    moodlens::logging::init_tracing(&config.logging).context("failed to initialise logging")?;

    tracing::info!("Starting Moodlens API server v{}", env!("CARGO_PKG_VERSION"));

    let engine_config = EngineConfig::from(&config);
    tracing::info!(
        min_entries = engine_config.min_entries,
        continuity = ?engine_config.continuity,
        window_days = config.analysis.window_days,
        "Analysis configured"
    );

    let store = Arc::new(MemoryEntryStore::new());
    let engine = Arc::new(PatternAnalysisEngine::new(engine_config));
    let api_config = ApiConfig::from_config(&config);

    let mut state = AppState::new(store, engine, api_config.clone());

    let has_key = config
        .generator
        .api_key
        .as_deref()
        .is_some_and(|key| !key.is_empty());

    if !config.generator.enabled {
        tracing::info!("External summary generator disabled in config");
    } else if !has_key {
        tracing::warn!("CEREBRAS_API_KEY not set, summaries will be rule-based");
    } else {
        let client = ChatCompletionsClient::new(config.generator.clone())
            .context("failed to create generator client")?;
        tracing::info!(
            endpoint = %client.endpoint(),
            model = %config.generator.model,
            "External summary generator enabled"
        );
        state = state.with_generator(Arc::new(client));
    }

    tracing::info!("Starting server on {}", api_config.addr());
    serve(state, &api_config).await?;

    tracing::info!("Moodlens API server stopped");

    Ok(())
}
