//! Summaries of an analysed period
//!
//! Two outputs are built from the same inputs:
//! - [`StructuredSummary`]: the machine-readable digest handed to an external
//!   text generator
//! - [`rule_based_summary`]: deterministic prose used whenever the external
//!   generator is not used or fails

use super::detector::{DetectedPattern, PatternKind, Severity};
use super::stats::{EntryStatistics, MoodRange, SleepShift};
use crate::entries::EnergyLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Returned in place of a summary when too few entries exist
pub const INSUFFICIENT_DATA_SUMMARY: &str =
    "Not enough data for pattern analysis. Please continue logging for at least 7 days.";

const STABLE_CLAUSE: &str =
    "Your mood patterns appear stable over the analyzed period. No significant episodes detected.";
const PATTERNS_CLOSING: &str = "These patterns may be worth discussing with a mental health professional for proper evaluation and support.";
const STABLE_CLOSING: &str = "Continue monitoring, and consider talking with a mental health professional if anything changes.";

const DATE_FORMAT: &str = "%b %-d, %Y";

/// Kinds of behaviour flagged as risk factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    RiskyBehavior,
    Impulsivity,
    FunctionalImpairment,
}

/// A behaviour observed on one or more days of the period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub factor: RiskKind,
    pub days: usize,
    pub severity: Severity,
}

/// List the risk factors present in the statistics, in fixed order
pub fn identify_risk_factors(stats: &EntryStatistics) -> Vec<RiskFactor> {
    let candidates = [
        (RiskKind::RiskyBehavior, stats.risky_days, 3),
        (RiskKind::Impulsivity, stats.impulsive_days, 5),
        // Any day of severe impairment is high risk
        (RiskKind::FunctionalImpairment, stats.severe_impairment_days, 0),
    ];

    candidates
        .into_iter()
        .filter(|(_, days, _)| *days > 0)
        .map(|(factor, days, high_above)| RiskFactor {
            factor,
            days,
            severity: if days > high_above {
                Severity::High
            } else {
                Severity::Moderate
            },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEpisodeDays {
    pub high: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodSummary {
    pub average: f64,
    pub volatility: f64,
    pub range: MoodRange,
    pub episodes: MoodEpisodeDays,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSummary {
    pub average: f64,
    pub low_sleep_days: usize,
    pub high_sleep_days: usize,
    /// Nights with a sharp change from the previous night
    pub pattern: Vec<SleepShift>,
}

/// Digest of a period sent to an external summary generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredSummary {
    pub total_days: usize,
    pub mood_stats: MoodSummary,
    pub sleep_stats: SleepSummary,
    pub energy_distribution: BTreeMap<EnergyLevel, usize>,
    pub patterns: Vec<DetectedPattern>,
    pub risk_factors: Vec<RiskFactor>,
}

impl StructuredSummary {
    pub fn build(stats: &EntryStatistics, patterns: &[DetectedPattern]) -> Self {
        Self {
            total_days: stats.entry_count,
            mood_stats: MoodSummary {
                average: round2(stats.average_mood),
                volatility: round2(stats.mood_volatility),
                range: stats.mood_range,
                episodes: MoodEpisodeDays {
                    high: stats.high_mood_days,
                    low: stats.low_mood_days,
                },
            },
            sleep_stats: SleepSummary {
                average: round2(stats.average_sleep),
                low_sleep_days: stats.low_sleep_days,
                high_sleep_days: stats.high_sleep_days,
                pattern: stats.sleep_shifts.clone(),
            },
            energy_distribution: stats.energy_distribution.clone(),
            patterns: patterns.to_vec(),
            risk_factors: identify_risk_factors(stats),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Deterministic narrative for a period
pub fn rule_based_summary(stats: &EntryStatistics, patterns: &[DetectedPattern]) -> String {
    let mut summary = format!(
        "Over the past {} days, your average mood was {:.1} on a -5 to +5 scale, with an average of {:.1} hours of sleep per night.",
        stats.entry_count, stats.average_mood, stats.average_sleep
    );

    if patterns.is_empty() {
        summary.push(' ');
        summary.push_str(STABLE_CLAUSE);
        summary.push(' ');
        summary.push_str(STABLE_CLOSING);
        return summary;
    }

    for (idx, pattern) in patterns.iter().enumerate() {
        let lead = if idx == 0 { "I noticed" } else { "Additionally, there was" };
        let description = match pattern.kind {
            PatternKind::Hypomanic => "with elevated mood and energy alongside reduced sleep",
            PatternKind::Depressive => "characterized by low mood and low energy",
        };
        summary.push_str(&format!(
            " {} a {}-day period from {} to {} {}.",
            lead,
            pattern.duration_days,
            pattern.start_date.format(DATE_FORMAT),
            pattern.end_date.format(DATE_FORMAT),
            description
        ));
    }

    summary.push(' ');
    summary.push_str(PATTERNS_CLOSING);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::{Impairment, MoodEntry};
    use chrono::NaiveDate;

    fn entries_with_flags(risky: usize, impulsive: usize, severe: usize) -> Vec<MoodEntry> {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        (0..10)
            .map(|i| {
                let mut e = MoodEntry::new(start + chrono::Duration::days(i as i64), 0, EnergyLevel::Normal, 8.0);
                e.risky_behavior = i < risky;
                e.impulsivity = i < impulsive;
                if i < severe {
                    e.functional_impairment = Impairment::Severe;
                }
                e
            })
            .collect()
    }

    #[test]
    fn test_risk_factor_thresholds() {
        let stats = EntryStatistics::compute(&entries_with_flags(3, 6, 1));
        let risks = identify_risk_factors(&stats);

        assert_eq!(
            risks,
            vec![
                RiskFactor { factor: RiskKind::RiskyBehavior, days: 3, severity: Severity::Moderate },
                RiskFactor { factor: RiskKind::Impulsivity, days: 6, severity: Severity::High },
                RiskFactor { factor: RiskKind::FunctionalImpairment, days: 1, severity: Severity::High },
            ]
        );

        let stats = EntryStatistics::compute(&entries_with_flags(4, 5, 0));
        let risks = identify_risk_factors(&stats);
        assert_eq!(risks.len(), 2);
        assert_eq!(risks[0].severity, Severity::High);
        assert_eq!(risks[1].severity, Severity::Moderate);
    }

    #[test]
    fn test_no_risk_factors() {
        let stats = EntryStatistics::compute(&entries_with_flags(0, 0, 0));
        assert!(identify_risk_factors(&stats).is_empty());
    }

    #[test]
    fn test_stable_summary_text() {
        let stats = EntryStatistics::compute(&entries_with_flags(0, 0, 0));
        let text = rule_based_summary(&stats, &[]);
        assert!(text.starts_with("Over the past 10 days, your average mood was 0.0"));
        assert!(text.contains("8.0 hours of sleep"));
        assert!(text.contains("appear stable"));
    }

    #[test]
    fn test_pattern_summary_text() {
        let stats = EntryStatistics::compute(&entries_with_flags(0, 0, 0));
        let patterns = vec![
            DetectedPattern {
                kind: PatternKind::Hypomanic,
                start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 4, 4).unwrap(),
                duration_days: 4,
                severity: Severity::Moderate,
            },
            DetectedPattern {
                kind: PatternKind::Depressive,
                start_date: NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 4, 14).unwrap(),
                duration_days: 5,
                severity: Severity::Severe,
            },
        ];

        let text = rule_based_summary(&stats, &patterns);
        assert!(text.contains("I noticed a 4-day period from Apr 1, 2024 to Apr 4, 2024"));
        assert!(text.contains("Additionally, there was a 5-day period"));
        assert!(text.ends_with(PATTERNS_CLOSING));
    }

    #[test]
    fn test_structured_summary_rounds_and_serializes() {
        let mut entries = entries_with_flags(1, 0, 0);
        entries[0].mood_rating = 1;
        entries[1].mood_rating = 1;
        entries[2].mood_rating = 0;

        let stats = EntryStatistics::compute(&entries);
        let summary = StructuredSummary::build(&stats, &[]);

        assert_eq!(summary.total_days, 10);
        assert_eq!(summary.mood_stats.average, 0.2);
        assert_eq!(summary.risk_factors.len(), 1);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["risk_factors"][0]["factor"], "risky_behavior");
        assert_eq!(json["energy_distribution"]["normal"], 10);
        assert_eq!(json["mood_stats"]["range"]["max"], 1);
    }
}
