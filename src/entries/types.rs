//! Core data types for daily mood entries
//!
//! This module defines the input records the analysis engine works on:
//! - `MoodEntry`: One day of self-reported mood, energy, sleep and behaviour
//! - `EnergyLevel`, `GoalActivity`, `Impairment`: Ordinal classification enums
//! - `EntrySeries`: A validated, date-sorted, duplicate-free set of entries

use super::error::EntryError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lowest allowed mood rating (depressive pole)
pub const MOOD_MIN: i8 = -5;
/// Highest allowed mood rating (manic pole)
pub const MOOD_MAX: i8 = 5;
/// Highest allowed irritability score
pub const IRRITABILITY_MAX: u8 = 5;
/// Maximum length of the free-text notes, in characters
pub const NOTES_MAX_CHARS: usize = 500;

/// A single day of mood tracking data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodEntry {
    /// Calendar day this entry describes (unique per user)
    pub date: NaiveDate,
    /// Mood from -5 (depressed) through 0 (neutral) to +5 (elevated)
    pub mood_rating: i8,
    /// Self-reported energy
    pub energy_level: EnergyLevel,
    /// Hours slept the night before
    pub sleep_hours: f64,
    /// Irritability from 0 to 5
    #[serde(default)]
    pub irritability: u8,
    /// Engaged in risky behaviour (spending, driving, ...)
    #[serde(default)]
    pub risky_behavior: bool,
    /// Acted impulsively
    #[serde(default)]
    pub impulsivity: bool,
    /// Amount of goal-directed activity
    #[serde(default)]
    pub goal_directed_activity: GoalActivity,
    /// How much mood interfered with daily functioning
    #[serde(default)]
    pub functional_impairment: Impairment,
    /// Free-text notes, never analysed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MoodEntry {
    /// Create an entry with the required fields; behaviour fields default to neutral
    pub fn new(date: NaiveDate, mood_rating: i8, energy_level: EnergyLevel, sleep_hours: f64) -> Self {
        Self {
            date,
            mood_rating,
            energy_level,
            sleep_hours,
            irritability: 0,
            risky_behavior: false,
            impulsivity: false,
            goal_directed_activity: GoalActivity::Normal,
            functional_impairment: Impairment::None,
            notes: None,
        }
    }

    /// Builder method: set irritability
    pub fn irritability(mut self, irritability: u8) -> Self {
        self.irritability = irritability;
        self
    }

    /// Builder method: flag risky behaviour
    pub fn risky(mut self, risky: bool) -> Self {
        self.risky_behavior = risky;
        self
    }

    /// Builder method: flag impulsivity
    pub fn impulsive(mut self, impulsive: bool) -> Self {
        self.impulsivity = impulsive;
        self
    }

    /// Builder method: set goal-directed activity
    pub fn activity(mut self, activity: GoalActivity) -> Self {
        self.goal_directed_activity = activity;
        self
    }

    /// Builder method: set functional impairment
    pub fn impairment(mut self, impairment: Impairment) -> Self {
        self.functional_impairment = impairment;
        self
    }

    /// Builder method: attach notes
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), EntryError> {
        if !(MOOD_MIN..=MOOD_MAX).contains(&self.mood_rating) {
            return Err(EntryError::MoodOutOfRange {
                date: self.date,
                value: self.mood_rating,
            });
        }

        if !self.sleep_hours.is_finite() || !(0.0..=24.0).contains(&self.sleep_hours) {
            return Err(EntryError::SleepOutOfRange {
                date: self.date,
                value: self.sleep_hours,
            });
        }

        if self.irritability > IRRITABILITY_MAX {
            return Err(EntryError::IrritabilityOutOfRange {
                date: self.date,
                value: self.irritability,
            });
        }

        if let Some(notes) = &self.notes {
            let chars = notes.chars().count();
            if chars > NOTES_MAX_CHARS {
                return Err(EntryError::NotesTooLong {
                    date: self.date,
                    chars,
                });
            }
        }

        Ok(())
    }
}

/// Self-reported energy, ordered from lowest to highest
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    Low,
    Normal,
    High,
    VeryHigh,
}

impl EnergyLevel {
    /// All levels in ordinal order
    pub const ALL: [EnergyLevel; 4] = [
        EnergyLevel::Low,
        EnergyLevel::Normal,
        EnergyLevel::High,
        EnergyLevel::VeryHigh,
    ];

    /// Position on the ordinal scale (0 = low)
    pub fn ordinal(&self) -> usize {
        match self {
            EnergyLevel::Low => 0,
            EnergyLevel::Normal => 1,
            EnergyLevel::High => 2,
            EnergyLevel::VeryHigh => 3,
        }
    }

    /// True for `high` and `very_high`
    pub fn is_elevated(&self) -> bool {
        matches!(self, EnergyLevel::High | EnergyLevel::VeryHigh)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyLevel::Low => "low",
            EnergyLevel::Normal => "normal",
            EnergyLevel::High => "high",
            EnergyLevel::VeryHigh => "very_high",
        }
    }
}

impl std::fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyLevel {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "low" => Ok(EnergyLevel::Low),
            "normal" => Ok(EnergyLevel::Normal),
            "high" => Ok(EnergyLevel::High),
            "very_high" | "veryhigh" => Ok(EnergyLevel::VeryHigh),
            other => Err(EntryError::Parse(format!("unknown energy level: {}", other))),
        }
    }
}

/// Amount of goal-directed activity
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GoalActivity {
    Low,
    #[default]
    Normal,
    High,
}

impl FromStr for GoalActivity {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(GoalActivity::Low),
            "normal" => Ok(GoalActivity::Normal),
            "high" => Ok(GoalActivity::High),
            other => Err(EntryError::Parse(format!("unknown activity level: {}", other))),
        }
    }
}

/// Functional impairment, ordered from none to severe
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Impairment {
    #[default]
    None,
    Mild,
    Moderate,
    Severe,
}

impl FromStr for Impairment {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Impairment::None),
            "mild" => Ok(Impairment::Mild),
            "moderate" => Ok(Impairment::Moderate),
            "severe" => Ok(Impairment::Severe),
            other => Err(EntryError::Parse(format!("unknown impairment level: {}", other))),
        }
    }
}

/// A validated sequence of one user's entries
///
/// Construction enforces the invariants the analysis engine relies on:
/// every entry passes [`MoodEntry::validate`], entries are sorted ascending
/// by date, and no date appears twice. Gaps between dates are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntrySeries {
    entries: Vec<MoodEntry>,
}

impl EntrySeries {
    /// Validate, sort and check a set of entries for duplicate dates
    pub fn new(mut entries: Vec<MoodEntry>) -> Result<Self, EntryError> {
        for entry in &entries {
            entry.validate()?;
        }

        entries.sort_by_key(|e| e.date);

        if let Some(pair) = entries.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(EntryError::DuplicateDate(pair[0].date));
        }

        Ok(Self { entries })
    }

    /// An empty series
    pub fn empty() -> Self {
        Self::default()
    }

    /// Entries in ascending date order
    pub fn entries(&self) -> &[MoodEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry, if any
    pub fn latest(&self) -> Option<&MoodEntry> {
        self.entries.last()
    }

    /// Entry for a specific day
    pub fn get(&self, date: NaiveDate) -> Option<&MoodEntry> {
        self.entries
            .binary_search_by_key(&date, |e| e.date)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// Entries strictly before `date`
    pub fn before(&self, date: NaiveDate) -> &[MoodEntry] {
        let end = self.entries.partition_point(|e| e.date < date);
        &self.entries[..end]
    }

    pub fn into_inner(self) -> Vec<MoodEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_validate_accepts_boundaries() {
        let entry = MoodEntry::new(day(1), -5, EnergyLevel::Low, 0.0).irritability(5);
        assert!(entry.validate().is_ok());

        let entry = MoodEntry::new(day(1), 5, EnergyLevel::VeryHigh, 24.0);
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let entry = MoodEntry::new(day(1), 6, EnergyLevel::Normal, 8.0);
        assert!(matches!(
            entry.validate(),
            Err(EntryError::MoodOutOfRange { value: 6, .. })
        ));

        let entry = MoodEntry::new(day(1), 0, EnergyLevel::Normal, 25.0);
        assert!(matches!(entry.validate(), Err(EntryError::SleepOutOfRange { .. })));

        let entry = MoodEntry::new(day(1), 0, EnergyLevel::Normal, f64::NAN);
        assert!(matches!(entry.validate(), Err(EntryError::SleepOutOfRange { .. })));

        let entry = MoodEntry::new(day(1), 0, EnergyLevel::Normal, 8.0).irritability(6);
        assert!(matches!(
            entry.validate(),
            Err(EntryError::IrritabilityOutOfRange { value: 6, .. })
        ));

        let entry = MoodEntry::new(day(1), 0, EnergyLevel::Normal, 8.0).notes("x".repeat(501));
        assert!(matches!(
            entry.validate(),
            Err(EntryError::NotesTooLong { chars: 501, .. })
        ));
    }

    #[test]
    fn test_series_sorts_by_date() {
        let series = EntrySeries::new(vec![
            MoodEntry::new(day(3), 0, EnergyLevel::Normal, 8.0),
            MoodEntry::new(day(1), 1, EnergyLevel::Normal, 8.0),
            MoodEntry::new(day(2), 2, EnergyLevel::Normal, 8.0),
        ])
        .unwrap();

        let dates: Vec<_> = series.entries().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);
        assert_eq!(series.latest().unwrap().date, day(3));
        assert_eq!(series.get(day(2)).unwrap().mood_rating, 2);
        assert_eq!(series.before(day(3)).len(), 2);
    }

    #[test]
    fn test_series_rejects_duplicate_dates() {
        let result = EntrySeries::new(vec![
            MoodEntry::new(day(1), 0, EnergyLevel::Normal, 8.0),
            MoodEntry::new(day(1), 1, EnergyLevel::Normal, 7.0),
        ]);
        assert!(matches!(result, Err(EntryError::DuplicateDate(d)) if d == day(1)));
    }

    #[test]
    fn test_energy_level_parsing() {
        assert_eq!("very_high".parse::<EnergyLevel>().unwrap(), EnergyLevel::VeryHigh);
        assert_eq!("Very High".parse::<EnergyLevel>().unwrap(), EnergyLevel::VeryHigh);
        assert_eq!(" low ".parse::<EnergyLevel>().unwrap(), EnergyLevel::Low);
        assert!("manic".parse::<EnergyLevel>().is_err());
        assert!(EnergyLevel::Low < EnergyLevel::VeryHigh);
    }

    #[test]
    fn test_entry_deserializes_with_defaults() {
        let json = r#"{"date":"2024-03-01","mood_rating":-2,"energy_level":"low","sleep_hours":9.5}"#;
        let entry: MoodEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.energy_level, EnergyLevel::Low);
        assert_eq!(entry.functional_impairment, Impairment::None);
        assert_eq!(entry.goal_directed_activity, GoalActivity::Normal);
        assert!(!entry.risky_behavior);
        assert!(entry.notes.is_none());
    }
}
