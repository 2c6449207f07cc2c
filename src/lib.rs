//! # Moodlens
//!
//! Pattern analysis for daily mood tracking - detects sustained elevated or
//! low periods, computes wellness statistics and produces narrative summaries.
//!
//! Moodlens flags patterns for the user to discuss with a professional; it
//! does not diagnose.
//!
//! ## Features
//!
//! - **Episode detection**: Hypomanic and depressive runs with severity
//! - **Statistics**: Wellness score, quality metrics, streaks and trends
//! - **Summaries**: Rule-based text, or an external LLM with fallback
//! - **REST API**: Per-user entry storage and analysis over HTTP
//!
//! ## Modules
//!
//! - [`entries`]: Entry model, validation, CSV import and storage
//! - [`analysis`]: Detector, statistics and the analysis engine
//! - [`generator`]: External summary generator client
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use moodlens::analysis::PatternAnalysisEngine;
//! use moodlens::entries::{CsvEntryImporter, EntrySeries};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let imported = CsvEntryImporter::new().import(Path::new("moods.csv"))?;
//!     let series = EntrySeries::new(imported.entries)?;
//!
//!     let result = PatternAnalysisEngine::default().analyze(&series);
//!     println!("{}", result.summary_text);
//!
//!     for pattern in &result.patterns {
//!         println!("{} from {} for {} days", pattern.kind, pattern.start_date, pattern.duration_days);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod entries;
pub mod generator;
pub mod logging;

// Re-export top-level types for convenience
pub use entries::{
    CsvEntryImporter, DateWindow, EnergyLevel, EntryError, EntrySeries, EntryStore, GoalActivity,
    Impairment, MemoryEntryStore, MoodEntry, SourceError,
};

pub use analysis::{
    AnalysisResult, AnalysisStatus, DetectedPattern, EngineConfig, EntryStatistics, PatternKind,
    PatternAnalysisEngine, RunContinuity, Severity,
};

pub use generator::{ChatCompletionsClient, GeneratorError, SummaryGenerator};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, LogFormat, LoggingConfig};
