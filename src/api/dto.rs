//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use crate::analysis::{DashboardSnapshot, Streaks};
use crate::entries::MoodEntry;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================
// ENTRY DTOs
// ============================================

/// Response after storing an entry
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateEntryResponse {
    /// The stored entry
    pub entry: MoodEntry,
    /// Whether an entry for the same date was replaced
    pub replaced: bool,
    /// Logging streaks after the write
    pub streak: Streaks,
}

/// Date window for listing entries; defaults to the configured window ending today
#[derive(Debug, Default, Deserialize)]
pub struct EntryQuery {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

/// Entries in a window, ascending by date
#[derive(Debug, Serialize, Deserialize)]
pub struct EntriesResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub count: usize,
    pub entries: Vec<MoodEntry>,
}

/// Overrides "today", for clients in another timezone
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Whether the day has an entry
#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: NaiveDate,
    pub has_entry: bool,
    pub entry: Option<MoodEntry>,
}

/// Response after deleting an entry
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteEntryResponse {
    pub deleted: MoodEntry,
}

// ============================================
// ANALYSIS DTOs
// ============================================

/// Analysis window parameters
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisQuery {
    /// Days of history ending at `date`; defaults to the configured window
    #[serde(default)]
    pub window_days: Option<i64>,
    /// Last day analysed; defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Daily insight response
#[derive(Debug, Serialize, Deserialize)]
pub struct DailyInsightResponse {
    pub date: NaiveDate,
    pub insight: String,
}

/// Dashboard statistics for a window
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(flatten)]
    pub snapshot: DashboardSnapshot,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded, unhealthy
    pub status: String,
    /// Entry store status
    pub store: String,
    /// External generator status: configured or disabled
    pub generator: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
