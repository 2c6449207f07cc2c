//! Pattern Analysis
//!
//! Everything derived from a user's entries:
//!
//! - **detector**: Hypomanic and depressive run detection
//! - **stats**: Descriptive statistics, wellness score and quality metrics
//! - **trends**: Week-over-week deltas
//! - **recommendations**: Rule-based advice for detected patterns
//! - **summary**: Rule-based narrative and the digest sent to external generators
//! - **engine**: `PatternAnalysisEngine`, which ties the above together
//!
//! All derived values are recomputed per call; nothing here holds state.

pub mod detector;
pub mod engine;
pub mod recommendations;
pub mod stats;
pub mod summary;
pub mod trends;

pub use detector::{DetectedPattern, EpisodeDetector, PatternKind, RunContinuity, Severity};
pub use engine::{
    AnalysisResult, AnalysisStatus, DashboardSnapshot, EngineConfig, PatternAnalysisEngine,
    FALLBACK_INSIGHT, MIN_ANALYSIS_ENTRIES, NO_ENTRY_TODAY_INSIGHT,
};
pub use recommendations::recommend;
pub use stats::{EntryStatistics, MoodRange, QualityMetrics, SleepShift, Streaks, WellnessScore};
pub use summary::{
    identify_risk_factors, rule_based_summary, RiskFactor, RiskKind, StructuredSummary,
    INSUFFICIENT_DATA_SUMMARY,
};
pub use trends::TrendDeltas;
