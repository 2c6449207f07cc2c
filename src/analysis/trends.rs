//! Week-over-week trend deltas
//!
//! Compares the most recent seven entries with the seven before them. Each
//! delta is a percentage change rounded to one decimal; a zero baseline
//! yields 0 instead of an infinite or NaN change.

use super::stats::{mean, moods, population_std_dev, sleeps, WellnessScore};
use crate::entries::MoodEntry;
use serde::{Deserialize, Serialize};

/// Entries per comparison window
pub const TREND_WINDOW: usize = 7;

/// Percentage changes between the previous and the latest seven entries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendDeltas {
    pub mood: f64,
    pub sleep: f64,
    /// Positive when mood became calmer
    pub volatility: f64,
    pub wellness: f64,
}

impl TrendDeltas {
    /// Compute trends, or `None` when fewer than two full windows exist
    pub fn compute(entries: &[MoodEntry]) -> Option<Self> {
        if entries.len() < TREND_WINDOW * 2 {
            return None;
        }

        let split = entries.len() - TREND_WINDOW;
        let last = &entries[split..];
        let prev = &entries[split - TREND_WINDOW..split];

        let last_mood = mean(&moods(last));
        let prev_mood = mean(&moods(prev));
        let last_sleep = mean(&sleeps(last));
        let prev_sleep = mean(&sleeps(prev));
        let last_std = population_std_dev(&moods(last));
        let prev_std = population_std_dev(&moods(prev));
        let last_wellness = WellnessScore::for_entries(last).total;
        let prev_wellness = WellnessScore::for_entries(prev).total;

        Some(Self {
            mood: percent_change(last_mood, prev_mood, prev_mood.abs()),
            sleep: percent_change(last_sleep, prev_sleep, prev_sleep),
            volatility: percent_change(prev_std, last_std, prev_std),
            wellness: percent_change(last_wellness, prev_wellness, prev_wellness),
        })
    }
}

fn percent_change(current: f64, baseline: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    round1((current - baseline) / denominator * 100.0)
}

/// Round to one decimal place, normalising negative zero
pub fn round1(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::EnergyLevel;
    use chrono::NaiveDate;

    fn series(moods: &[i8], sleep: &[f64]) -> Vec<MoodEntry> {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        moods
            .iter()
            .zip(sleep)
            .enumerate()
            .map(|(i, (m, s))| {
                MoodEntry::new(start + chrono::Duration::days(i as i64), *m, EnergyLevel::Normal, *s)
            })
            .collect()
    }

    #[test]
    fn test_requires_two_windows() {
        let entries = series(&[0; 13], &[8.0; 13]);
        assert!(TrendDeltas::compute(&entries).is_none());

        let entries = series(&[0; 14], &[8.0; 14]);
        assert!(TrendDeltas::compute(&entries).is_some());
    }

    #[test]
    fn test_zero_baseline_mood_gives_zero() {
        let mut moods = vec![0i8; 7];
        moods.extend([3i8; 7]);
        let entries = series(&moods, &[8.0; 14]);

        let trends = TrendDeltas::compute(&entries).unwrap();
        assert_eq!(trends.mood, 0.0);
        assert_eq!(trends.sleep, 0.0);
        assert_eq!(trends.volatility, 0.0);
    }

    #[test]
    fn test_mood_trend_uses_absolute_baseline() {
        let mut moods = vec![-2i8; 7];
        moods.extend([-1i8; 7]);
        let entries = series(&moods, &[8.0; 14]);

        let trends = TrendDeltas::compute(&entries).unwrap();
        // (-1 - -2) / |-2| = +50%
        assert_eq!(trends.mood, 50.0);
    }

    #[test]
    fn test_sleep_and_volatility_trends() {
        let moods = [2i8, -2, 2, -2, 2, -2, 2, 1, -1, 1, -1, 1, -1, 1];
        let mut sleep = vec![8.0; 7];
        sleep.extend([6.0; 7]);
        let entries = series(&moods, &sleep);

        let trends = TrendDeltas::compute(&entries).unwrap();
        assert_eq!(trends.sleep, -25.0);
        // Spread roughly halved, so volatility improved
        assert!(trends.volatility > 0.0);
    }

    #[test]
    fn test_only_last_fourteen_entries_matter() {
        let mut moods = vec![-5i8; 10];
        moods.extend([1i8; 7]);
        moods.extend([2i8; 7]);
        let entries = series(&moods, &[8.0; 24]);

        let trends = TrendDeltas::compute(&entries).unwrap();
        assert_eq!(trends.mood, 100.0);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(12.345), 12.3);
        assert_eq!(round1(-0.04), 0.0);
        assert!(round1(-0.04).is_sign_positive());
    }
}
