//! Pattern Analysis Engine
//!
//! Turns a validated entry series into an [`AnalysisResult`]. The rule-based
//! path is synchronous and deterministic; the optional external generator
//! only ever replaces the summary text, and any failure on that path falls
//! back to the rule-based text.

use super::detector::{DetectedPattern, EpisodeDetector, RunContinuity};
use super::recommendations::recommend;
use super::stats::{mean, EntryStatistics, QualityMetrics};
use super::summary::{rule_based_summary, StructuredSummary, INSUFFICIENT_DATA_SUMMARY};
use super::trends::TrendDeltas;
use crate::config::Config;
use crate::entries::{EntrySeries, MoodEntry};
use crate::generator::{prompt, GeneratorError, SummaryGenerator};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Fewest entries the engine will ever analyse for patterns
pub const MIN_ANALYSIS_ENTRIES: usize = 7;

/// Returned by the daily insight when today has no entry
pub const NO_ENTRY_TODAY_INSIGHT: &str = "Log today's mood to receive a personalized insight!";
/// Returned by the daily insight when generation is unavailable
pub const FALLBACK_INSIGHT: &str = "Keep tracking your mood - consistency brings awareness!";

/// Entries considered as recent history for the daily insight
const INSIGHT_HISTORY: usize = 7;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Entries required before patterns are analysed; never below 7
    pub min_entries: usize,
    pub continuity: RunContinuity,
    /// Upper bound on a single external generator call
    pub generator_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_entries: MIN_ANALYSIS_ENTRIES,
            continuity: RunContinuity::default(),
            generator_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&Config> for EngineConfig {
    fn from(config: &Config) -> Self {
        Self {
            min_entries: config.analysis.min_entries,
            continuity: config.analysis.continuity,
            generator_timeout: Duration::from_millis(config.generator.request_timeout_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Complete,
    InsufficientData,
}

/// Outcome of one analysis invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub status: AnalysisStatus,
    pub entry_count: usize,
    pub summary_text: String,
    /// Absent when there was not enough data
    pub metrics: Option<QualityMetrics>,
    pub statistics: Option<EntryStatistics>,
    /// Present only with at least two weeks of entries
    pub trends: Option<TrendDeltas>,
    pub patterns: Vec<DetectedPattern>,
    pub recommendations: Vec<String>,
    pub using_external_generator: bool,
    /// Why the external generator's text was not used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator_error: Option<String>,
}

impl AnalysisResult {
    fn insufficient(entry_count: usize) -> Self {
        Self {
            status: AnalysisStatus::InsufficientData,
            entry_count,
            summary_text: INSUFFICIENT_DATA_SUMMARY.to_string(),
            metrics: None,
            statistics: None,
            trends: None,
            patterns: Vec::new(),
            recommendations: Vec::new(),
            using_external_generator: false,
            generator_error: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == AnalysisStatus::Complete
    }
}

/// Statistics for dashboards; available for any number of entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub statistics: EntryStatistics,
    pub metrics: QualityMetrics,
    pub trends: Option<TrendDeltas>,
}

/// Stateless analysis engine, shareable across requests
#[derive(Debug, Clone, Default)]
pub struct PatternAnalysisEngine {
    config: EngineConfig,
    detector: EpisodeDetector,
}

impl PatternAnalysisEngine {
    pub fn new(mut config: EngineConfig) -> Self {
        config.min_entries = config.min_entries.max(MIN_ANALYSIS_ENTRIES);
        let detector = EpisodeDetector::new(config.continuity);
        Self { config, detector }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rule-based analysis of a series
    pub fn analyze(&self, series: &EntrySeries) -> AnalysisResult {
        let entries = series.entries();

        if entries.len() < self.config.min_entries {
            tracing::debug!(
                entries = entries.len(),
                required = self.config.min_entries,
                "Not enough entries for pattern analysis"
            );
            return AnalysisResult::insufficient(entries.len());
        }

        let statistics = EntryStatistics::compute(entries);
        let patterns = self.detector.detect(entries);
        let summary_text = rule_based_summary(&statistics, &patterns);
        let recommendations = recommend(&patterns);

        tracing::info!(
            entries = entries.len(),
            patterns = patterns.len(),
            wellness = statistics.wellness.total,
            "Pattern analysis complete"
        );

        AnalysisResult {
            status: AnalysisStatus::Complete,
            entry_count: entries.len(),
            summary_text,
            metrics: Some(QualityMetrics::compute(entries)),
            statistics: Some(statistics),
            trends: TrendDeltas::compute(entries),
            patterns,
            recommendations,
            using_external_generator: false,
            generator_error: None,
        }
    }

    /// Analysis whose summary text comes from an external generator when it succeeds
    ///
    /// Never fails: generator errors and timeouts leave the rule-based text in
    /// place and are reported in `generator_error`.
    pub async fn analyze_with_generator(
        &self,
        series: &EntrySeries,
        generator: &dyn SummaryGenerator,
    ) -> AnalysisResult {
        let mut result = self.analyze(series);

        let summary = result
            .statistics
            .as_ref()
            .filter(|_| result.is_complete())
            .map(|statistics| StructuredSummary::build(statistics, &result.patterns));
        let Some(summary) = summary else {
            return result;
        };

        match self.bounded(generator.generate(&summary)).await {
            Ok(text) => {
                tracing::info!(generator = generator.name(), "Using external summary");
                result.summary_text = text;
                result.using_external_generator = true;
            }
            Err(e) => {
                tracing::warn!(
                    generator = generator.name(),
                    error = %e,
                    "External summary failed, using rule-based summary"
                );
                result.generator_error = Some(e.to_string());
            }
        }

        result
    }

    /// Descriptive statistics without the minimum entry requirement
    pub fn snapshot(&self, series: &EntrySeries) -> DashboardSnapshot {
        let entries = series.entries();
        DashboardSnapshot {
            statistics: EntryStatistics::compute(entries),
            metrics: QualityMetrics::compute(entries),
            trends: TrendDeltas::compute(entries),
        }
    }

    /// Short encouraging message about today's entry
    ///
    /// `previous` holds earlier entries in date order; only the last seven are used.
    pub async fn daily_insight(
        &self,
        today: Option<&MoodEntry>,
        previous: &[MoodEntry],
        generator: Option<&dyn SummaryGenerator>,
    ) -> String {
        let Some(today) = today else {
            return NO_ENTRY_TODAY_INSIGHT.to_string();
        };
        let Some(generator) = generator else {
            return FALLBACK_INSIGHT.to_string();
        };

        let recent = &previous[previous.len().saturating_sub(INSIGHT_HISTORY)..];
        let recent_moods: Vec<f64> = recent.iter().map(|e| e.mood_rating as f64).collect();
        let request = prompt::daily_insight_request(today, mean(&recent_moods));

        match self.bounded(generator.complete(request)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(generator = generator.name(), error = %e, "Daily insight failed");
                FALLBACK_INSIGHT.to_string()
            }
        }
    }

    /// Apply the generator timeout and reject blank text
    async fn bounded<F>(&self, call: F) -> Result<String, GeneratorError>
    where
        F: Future<Output = Result<String, GeneratorError>>,
    {
        let text = tokio::time::timeout(self.config.generator_timeout, call)
            .await
            .map_err(|_| GeneratorError::Timeout)??;

        let text = text.trim();
        if text.is_empty() {
            return Err(GeneratorError::MalformedResponse("empty text".to_string()));
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{recommendations, PatternKind, Severity};
    use crate::entries::EnergyLevel;
    use crate::generator::CompletionRequest;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(n - 1)
    }

    fn neutral_series(count: i64) -> EntrySeries {
        EntrySeries::new(
            (1..=count)
                .map(|n| MoodEntry::new(day(n), 0, EnergyLevel::Normal, 8.0))
                .collect(),
        )
        .unwrap()
    }

    enum MockGenerator {
        Reply(&'static str),
        Fail,
        Slow,
    }

    #[async_trait]
    impl SummaryGenerator for MockGenerator {
        fn name(&self) -> &str {
            "mock"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<String, GeneratorError> {
            match self {
                MockGenerator::Reply(text) => Ok(text.to_string()),
                MockGenerator::Fail => Err(GeneratorError::Unavailable),
                MockGenerator::Slow => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok("too late".to_string())
                }
            }
        }
    }

    fn fast_engine() -> PatternAnalysisEngine {
        PatternAnalysisEngine::new(EngineConfig {
            generator_timeout: Duration::from_millis(50),
            ..Default::default()
        })
    }

    #[test]
    fn test_insufficient_data() {
        let engine = PatternAnalysisEngine::default();
        let result = engine.analyze(&neutral_series(6));

        assert_eq!(result.status, AnalysisStatus::InsufficientData);
        assert_eq!(result.entry_count, 6);
        assert_eq!(result.summary_text, INSUFFICIENT_DATA_SUMMARY);
        assert!(result.patterns.is_empty());
        assert!(result.recommendations.is_empty());
        assert!(result.metrics.is_none());

        let empty = engine.analyze(&EntrySeries::empty());
        assert_eq!(empty.status, AnalysisStatus::InsufficientData);
    }

    #[test]
    fn test_min_entries_cannot_drop_below_seven() {
        let engine = PatternAnalysisEngine::new(EngineConfig {
            min_entries: 2,
            ..Default::default()
        });
        assert_eq!(engine.config().min_entries, 7);
        assert!(!engine.analyze(&neutral_series(6)).is_complete());
        assert!(engine.analyze(&neutral_series(7)).is_complete());
    }

    #[test]
    fn test_ten_day_hypomanic_example() {
        let mut entries: Vec<_> = (1..=4)
            .map(|n| MoodEntry::new(day(n), 4, EnergyLevel::VeryHigh, 4.0))
            .collect();
        entries.extend((5..=10).map(|n| MoodEntry::new(day(n), 0, EnergyLevel::Normal, 8.0)));

        let result = PatternAnalysisEngine::default().analyze(&EntrySeries::new(entries.clone()).unwrap());

        assert!(result.is_complete());
        assert_eq!(result.patterns.len(), 1);
        assert_eq!(result.patterns[0].kind, PatternKind::Hypomanic);
        assert_eq!(result.patterns[0].start_date, day(1));
        assert_eq!(result.patterns[0].duration_days, 4);
        assert_eq!(result.patterns[0].severity, Severity::Moderate);
        assert_eq!(
            result.recommendations,
            vec![recommendations::ELEVATED_ENERGY_ADVISORY, recommendations::DISCLAIMER]
        );
        assert!(result.trends.is_none());

        entries[1] = entries[1].clone().risky(true);
        let result = PatternAnalysisEngine::default().analyze(&EntrySeries::new(entries).unwrap());
        assert_eq!(result.patterns[0].severity, Severity::High);
    }

    #[test]
    fn test_thirty_neutral_days() {
        let result = PatternAnalysisEngine::default().analyze(&neutral_series(30));

        assert!(result.patterns.is_empty());
        let stats = result.statistics.unwrap();
        assert_eq!(stats.mood_volatility, 0.0);
        assert_eq!(stats.wellness.total, 80.0);

        let metrics = result.metrics.unwrap();
        assert_eq!(metrics.mood_stability, 100.0);
        assert_eq!(metrics.sleep_quality, 100.0);
        assert_eq!(metrics.energy_consistency, 100.0);

        assert_eq!(result.recommendations.last().unwrap(), recommendations::DISCLAIMER);
        assert!(!result.using_external_generator);
    }

    #[test]
    fn test_zero_baseline_mood_trend() {
        let entries: Vec<_> = (1..=14)
            .map(|n| {
                let mood = if n <= 7 { 0 } else { 2 };
                MoodEntry::new(day(n), mood, EnergyLevel::Normal, 8.0)
            })
            .collect();

        let result = PatternAnalysisEngine::default().analyze(&EntrySeries::new(entries).unwrap());
        let trends = result.trends.unwrap();
        assert_eq!(trends.mood, 0.0);
        assert!(trends.wellness > 0.0);
    }

    #[test]
    fn test_snapshot_has_no_minimum() {
        let engine = PatternAnalysisEngine::default();

        let snapshot = engine.snapshot(&neutral_series(3));
        assert_eq!(snapshot.statistics.entry_count, 3);
        assert_eq!(snapshot.statistics.streaks.current, 3);

        let empty = engine.snapshot(&EntrySeries::empty());
        assert_eq!(empty.statistics.wellness.total, 0.0);
        assert!(empty.trends.is_none());
    }

    #[tokio::test]
    async fn test_external_summary_used() {
        let result = fast_engine()
            .analyze_with_generator(&neutral_series(10), &MockGenerator::Reply("  A calm month.  "))
            .await;

        assert!(result.using_external_generator);
        assert_eq!(result.summary_text, "A calm month.");
        assert!(result.generator_error.is_none());
    }

    #[tokio::test]
    async fn test_failing_generator_falls_back() {
        let engine = fast_engine();
        let rule_based = engine.analyze(&neutral_series(10)).summary_text;

        for generator in [MockGenerator::Fail, MockGenerator::Slow, MockGenerator::Reply("   ")] {
            let result = engine.analyze_with_generator(&neutral_series(10), &generator).await;

            assert!(result.is_complete());
            assert!(!result.using_external_generator);
            assert_eq!(result.summary_text, rule_based);
            assert!(result.generator_error.is_some());
        }
    }

    #[tokio::test]
    async fn test_generator_not_called_without_enough_data() {
        let result = fast_engine()
            .analyze_with_generator(&neutral_series(3), &MockGenerator::Reply("unused"))
            .await;

        assert_eq!(result.status, AnalysisStatus::InsufficientData);
        assert!(!result.using_external_generator);
        assert!(result.generator_error.is_none());
    }

    #[tokio::test]
    async fn test_daily_insight() {
        let engine = fast_engine();
        let series = neutral_series(10);
        let today = series.latest();
        let previous = series.before(day(10));

        assert_eq!(
            engine.daily_insight(None, previous, Some(&MockGenerator::Reply("hi"))).await,
            NO_ENTRY_TODAY_INSIGHT
        );
        assert_eq!(engine.daily_insight(today, previous, None).await, FALLBACK_INSIGHT);
        assert_eq!(
            engine.daily_insight(today, previous, Some(&MockGenerator::Fail)).await,
            FALLBACK_INSIGHT
        );
        assert_eq!(
            engine.daily_insight(today, previous, Some(&MockGenerator::Slow)).await,
            FALLBACK_INSIGHT
        );
        assert_eq!(
            engine
                .daily_insight(today, previous, Some(&MockGenerator::Reply("Nice and steady.")))
                .await,
            "Nice and steady."
        );
    }

    #[test]
    fn test_result_serialization() {
        let result = PatternAnalysisEngine::default().analyze(&neutral_series(6));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "insufficient_data");
        assert!(json.get("generator_error").is_none());
        assert!(json["metrics"].is_null());
    }
}
