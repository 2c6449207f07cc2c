//! Episode Detector
//!
//! Scans a date-sorted entry sequence once and emits runs of consecutive
//! entries that satisfy a pattern's membership rule for long enough.
//!
//! Each pattern kind has its own accumulator; both are fed every entry in the
//! same pass and never interact. When a run breaks (non-member entry, date gap,
//! or end of input) it is emitted if it reached the kind's minimum length, and
//! the accumulator starts empty again. Entries consumed by an emitted run are
//! never re-examined, so runs of the same kind never overlap.

use crate::entries::{EnergyLevel, Impairment, MoodEntry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How consecutive entries are decided
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunContinuity {
    /// Runs only extend across adjacent calendar days; a missing day breaks the run
    #[default]
    CalendarDays,
    /// Runs extend across adjacent entries regardless of missing days
    EntryOrder,
}

/// Kind of detected episode
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Elevated mood, high energy and short sleep
    Hypomanic,
    /// Low mood and low energy
    Depressive,
}

impl PatternKind {
    /// Minimum number of member entries before a run is reported
    pub fn min_run_length(&self) -> usize {
        match self {
            PatternKind::Hypomanic => 3,
            PatternKind::Depressive => 5,
        }
    }

    /// Whether an entry belongs to a run of this kind
    pub fn is_member(&self, entry: &MoodEntry) -> bool {
        match self {
            PatternKind::Hypomanic => {
                entry.mood_rating >= 3 && entry.energy_level.is_elevated() && entry.sleep_hours < 6.0
            }
            PatternKind::Depressive => {
                entry.mood_rating <= -2 && entry.energy_level == EnergyLevel::Low
            }
        }
    }

    fn severity(&self, members: &[&MoodEntry]) -> Severity {
        match self {
            PatternKind::Hypomanic if members.iter().any(|e| e.risky_behavior) => Severity::High,
            PatternKind::Depressive
                if members
                    .iter()
                    .any(|e| e.functional_impairment == Impairment::Severe) =>
            {
                Severity::Severe
            }
            _ => Severity::Moderate,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Hypomanic => "hypomanic",
            PatternKind::Depressive => "depressive",
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a detected pattern, derived from co-occurring risk markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Moderate,
    High,
    Severe,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Moderate => write!(f, "moderate"),
            Severity::High => write!(f, "high"),
            Severity::Severe => write!(f, "severe"),
        }
    }
}

/// A qualifying run of entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedPattern {
    #[serde(rename = "type")]
    pub kind: PatternKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Number of member entries in the run
    pub duration_days: u32,
    pub severity: Severity,
}

/// Open run for one pattern kind
struct RunAccumulator<'a> {
    kind: PatternKind,
    members: Vec<&'a MoodEntry>,
}

impl<'a> RunAccumulator<'a> {
    fn new(kind: PatternKind) -> Self {
        Self {
            kind,
            members: Vec::new(),
        }
    }

    /// Feed the next entry, returning a pattern if this entry closed a qualifying run
    fn push(&mut self, entry: &'a MoodEntry, continuity: RunContinuity) -> Option<DetectedPattern> {
        if !self.kind.is_member(entry) {
            return self.close();
        }

        let broken_by_gap = continuity == RunContinuity::CalendarDays
            && self
                .members
                .last()
                .is_some_and(|last| last.date.succ_opt() != Some(entry.date));

        let emitted = if broken_by_gap { self.close() } else { None };
        self.members.push(entry);
        emitted
    }

    /// End the current run, emitting it if long enough
    fn close(&mut self) -> Option<DetectedPattern> {
        let members = std::mem::take(&mut self.members);
        if members.len() < self.kind.min_run_length() {
            return None;
        }

        let first = members.first()?;
        let last = members.last()?;

        Some(DetectedPattern {
            kind: self.kind,
            start_date: first.date,
            end_date: last.date,
            duration_days: members.len() as u32,
            severity: self.kind.severity(&members),
        })
    }
}

/// Detects hypomanic and depressive runs in a sorted entry sequence
#[derive(Debug, Clone, Copy, Default)]
pub struct EpisodeDetector {
    continuity: RunContinuity,
}

impl EpisodeDetector {
    pub fn new(continuity: RunContinuity) -> Self {
        Self { continuity }
    }

    pub fn continuity(&self) -> RunContinuity {
        self.continuity
    }

    /// Detect patterns, returned in chronological order of `start_date`
    ///
    /// `entries` must be sorted ascending by date with no duplicate dates.
    pub fn detect(&self, entries: &[MoodEntry]) -> Vec<DetectedPattern> {
        let mut hypomanic = RunAccumulator::new(PatternKind::Hypomanic);
        let mut depressive = RunAccumulator::new(PatternKind::Depressive);
        let mut patterns = Vec::new();

        for entry in entries {
            patterns.extend(hypomanic.push(entry, self.continuity));
            patterns.extend(depressive.push(entry, self.continuity));
        }

        patterns.extend(hypomanic.close());
        patterns.extend(depressive.close());

        patterns.sort_by_key(|p| p.start_date);

        tracing::debug!(
            entries = entries.len(),
            patterns = patterns.len(),
            continuity = ?self.continuity,
            "Episode detection finished"
        );

        patterns
    }
}
