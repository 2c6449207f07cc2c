//! Rule-based recommendations for detected patterns

use super::detector::{DetectedPattern, PatternKind};

pub const ELEVATED_ENERGY_ADVISORY: &str =
    "Consider discussing high-energy periods with a healthcare provider.";
pub const LOW_MOOD_ADVISORY: &str =
    "Your data shows periods of low mood. Reach out to your support system.";
pub const KEEP_TRACKING_ADVISORY: &str =
    "Keep tracking to build more comprehensive data for analysis.";
/// Always the final recommendation
pub const DISCLAIMER: &str = "Remember: This tool provides insights but not medical diagnoses.";

/// Build the recommendation list; every applicable rule fires, disclaimer last
pub fn recommend(patterns: &[DetectedPattern]) -> Vec<String> {
    let has = |kind: PatternKind| patterns.iter().any(|p| p.kind == kind);

    let mut recommendations = Vec::with_capacity(3);

    if has(PatternKind::Hypomanic) {
        recommendations.push(ELEVATED_ENERGY_ADVISORY.to_string());
    }
    if has(PatternKind::Depressive) {
        recommendations.push(LOW_MOOD_ADVISORY.to_string());
    }
    if patterns.is_empty() {
        recommendations.push(KEEP_TRACKING_ADVISORY.to_string());
    }

    recommendations.push(DISCLAIMER.to_string());
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::detector::Severity;
    use chrono::NaiveDate;

    fn pattern(kind: PatternKind) -> DetectedPattern {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        DetectedPattern {
            kind,
            start_date: date,
            end_date: date,
            duration_days: 5,
            severity: Severity::Moderate,
        }
    }

    #[test]
    fn test_no_patterns() {
        assert_eq!(recommend(&[]), vec![KEEP_TRACKING_ADVISORY, DISCLAIMER]);
    }

    #[test]
    fn test_both_kinds_in_rule_order() {
        let recs = recommend(&[pattern(PatternKind::Depressive), pattern(PatternKind::Hypomanic)]);
        assert_eq!(recs, vec![ELEVATED_ENERGY_ADVISORY, LOW_MOOD_ADVISORY, DISCLAIMER]);
    }

    #[test]
    fn test_repeated_kind_fires_once() {
        let recs = recommend(&[pattern(PatternKind::Hypomanic), pattern(PatternKind::Hypomanic)]);
        assert_eq!(recs, vec![ELEVATED_ENERGY_ADVISORY, DISCLAIMER]);
    }
}
