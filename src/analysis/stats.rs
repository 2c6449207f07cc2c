//! Descriptive statistics over an entry slice
//!
//! Every function here is total: an empty slice yields zeros (or `None` for
//! values with no neutral element) instead of NaN.

use crate::entries::{EnergyLevel, Impairment, MoodEntry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mood at or above this counts as a high-mood day
pub const HIGH_MOOD_THRESHOLD: i8 = 3;
/// Mood at or below this counts as a low-mood day
pub const LOW_MOOD_THRESHOLD: i8 = -2;
/// Sleep below this many hours is a low-sleep day
pub const LOW_SLEEP_HOURS: f64 = 6.0;
/// Sleep above this many hours is a high-sleep day
pub const HIGH_SLEEP_HOURS: f64 = 9.0;
/// Night-to-night change in hours that counts as a sleep shift
pub const SLEEP_SHIFT_HOURS: f64 = 3.0;

/// Healthy sleep band used for sleep quality, inclusive
const HEALTHY_SLEEP: std::ops::RangeInclusive<f64> = 7.0..=9.0;

/// Arithmetic mean, 0 for no values
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, 0 for no values
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

pub(crate) fn moods(entries: &[MoodEntry]) -> Vec<f64> {
    entries.iter().map(|e| e.mood_rating as f64).collect()
}

pub(crate) fn sleeps(entries: &[MoodEntry]) -> Vec<f64> {
    entries.iter().map(|e| e.sleep_hours).collect()
}

/// Composite wellness score and its three components
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WellnessScore {
    /// 0-40, linear in average mood
    pub mood_score: f64,
    /// 0-30, saturating at 8 hours average sleep
    pub sleep_score: f64,
    /// 0-30, decreasing with mood volatility
    pub stability_score: f64,
    /// Sum of the components, capped at 100
    pub total: f64,
}

impl WellnessScore {
    pub fn compute(average_mood: f64, average_sleep: f64, mood_volatility: f64) -> Self {
        let mood_score = ((average_mood + 5.0) / 10.0) * 40.0;
        let sleep_score = (average_sleep / 8.0).min(1.0) * 30.0;
        let stability_score = (10.0 - mood_volatility).max(0.0) * 3.0;
        let total = (mood_score + sleep_score + stability_score).min(100.0);

        Self {
            mood_score,
            sleep_score,
            stability_score,
            total,
        }
    }

    /// Wellness of an entry slice; an empty slice scores 0
    pub fn for_entries(entries: &[MoodEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }
        let moods = moods(entries);
        Self::compute(
            mean(&moods),
            mean(&sleeps(entries)),
            population_std_dev(&moods),
        )
    }
}

/// The three 0-100 quality metrics reported with every analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub mood_stability: f64,
    pub sleep_quality: f64,
    pub energy_consistency: f64,
}

impl QualityMetrics {
    pub fn compute(entries: &[MoodEntry]) -> Self {
        let wellness = WellnessScore::for_entries(entries);
        let mood_stability = if entries.is_empty() {
            0.0
        } else {
            wellness.stability_score / 30.0 * 100.0
        };

        let sleep_quality = if entries.is_empty() {
            0.0
        } else {
            let healthy = entries
                .iter()
                .filter(|e| HEALTHY_SLEEP.contains(&e.sleep_hours))
                .count();
            healthy as f64 / entries.len() as f64 * 100.0
        };

        let energy_consistency = if entries.len() < 2 {
            100.0
        } else {
            let changes = entries
                .windows(2)
                .filter(|w| w[0].energy_level != w[1].energy_level)
                .count();
            100.0 * (1.0 - changes as f64 / (entries.len() - 1) as f64)
        };

        Self {
            mood_stability,
            sleep_quality,
            energy_consistency,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodRange {
    pub min: i8,
    pub max: i8,
}

/// A night whose sleep differs sharply from the previous entry's
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepShift {
    pub date: NaiveDate,
    /// Signed change in hours relative to the previous entry
    pub change: f64,
}

/// Consecutive-day logging streaks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    /// Consecutive calendar days ending at the latest entry
    pub current: u32,
    pub longest: u32,
}

impl Streaks {
    pub fn compute(entries: &[MoodEntry]) -> Self {
        let Some(first) = entries.first() else {
            return Self::default();
        };

        let mut run = 1u32;
        let mut longest = 1u32;
        let mut previous = first.date;

        for entry in &entries[1..] {
            if previous.succ_opt() == Some(entry.date) {
                run += 1;
            } else {
                run = 1;
            }
            longest = longest.max(run);
            previous = entry.date;
        }

        Self {
            current: run,
            longest,
        }
    }
}

/// Full descriptive statistics of an entry slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryStatistics {
    pub entry_count: usize,
    pub average_mood: f64,
    pub average_sleep: f64,
    /// Population standard deviation of mood
    pub mood_volatility: f64,
    pub mood_range: MoodRange,
    pub high_mood_days: usize,
    pub low_mood_days: usize,
    pub low_sleep_days: usize,
    pub high_sleep_days: usize,
    pub sleep_shifts: Vec<SleepShift>,
    pub energy_distribution: BTreeMap<EnergyLevel, usize>,
    pub dominant_energy: Option<EnergyLevel>,
    pub risky_days: usize,
    pub impulsive_days: usize,
    pub severe_impairment_days: usize,
    pub streaks: Streaks,
    pub wellness: WellnessScore,
}

impl Default for EntryStatistics {
    fn default() -> Self {
        Self::compute(&[])
    }
}

impl EntryStatistics {
    pub fn compute(entries: &[MoodEntry]) -> Self {
        let moods = moods(entries);
        let sleeps = sleeps(entries);

        let average_mood = mean(&moods);
        let average_sleep = mean(&sleeps);
        let mood_volatility = population_std_dev(&moods);

        let mood_range = MoodRange {
            min: entries.iter().map(|e| e.mood_rating).min().unwrap_or(0),
            max: entries.iter().map(|e| e.mood_rating).max().unwrap_or(0),
        };

        let count = |pred: fn(&MoodEntry) -> bool| entries.iter().filter(|e| pred(e)).count();

        let sleep_shifts = entries
            .windows(2)
            .filter_map(|w| {
                let change = w[1].sleep_hours - w[0].sleep_hours;
                (change.abs() > SLEEP_SHIFT_HOURS).then_some(SleepShift {
                    date: w[1].date,
                    change,
                })
            })
            .collect();

        let mut energy_distribution: BTreeMap<EnergyLevel, usize> =
            EnergyLevel::ALL.iter().map(|level| (*level, 0)).collect();
        let mut first_seen = Vec::with_capacity(EnergyLevel::ALL.len());
        for entry in entries {
            *energy_distribution.entry(entry.energy_level).or_insert(0) += 1;
            if !first_seen.contains(&entry.energy_level) {
                first_seen.push(entry.energy_level);
            }
        }

        // Strict comparison keeps the earliest-seen level on ties
        let mut dominant_energy: Option<(EnergyLevel, usize)> = None;
        for level in first_seen {
            let n = energy_distribution.get(&level).copied().unwrap_or(0);
            if dominant_energy.map_or(true, |(_, best)| n > best) {
                dominant_energy = Some((level, n));
            }
        }

        let wellness = if entries.is_empty() {
            WellnessScore::default()
        } else {
            WellnessScore::compute(average_mood, average_sleep, mood_volatility)
        };

        Self {
            entry_count: entries.len(),
            average_mood,
            average_sleep,
            mood_volatility,
            mood_range,
            high_mood_days: count(|e| e.mood_rating >= HIGH_MOOD_THRESHOLD),
            low_mood_days: count(|e| e.mood_rating <= LOW_MOOD_THRESHOLD),
            low_sleep_days: count(|e| e.sleep_hours < LOW_SLEEP_HOURS),
            high_sleep_days: count(|e| e.sleep_hours > HIGH_SLEEP_HOURS),
            sleep_shifts,
            energy_distribution,
            dominant_energy: dominant_energy.map(|(level, _)| level),
            risky_days: count(|e| e.risky_behavior),
            impulsive_days: count(|e| e.impulsivity),
            severe_impairment_days: count(|e| e.functional_impairment == Impairment::Severe),
            streaks: Streaks::compute(entries),
            wellness,
        }
    }
}
