//! Prompt construction

use super::{CompletionRequest, GeneratorError};
use crate::analysis::StructuredSummary;
use crate::entries::MoodEntry;

pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are a mental health pattern analyzer. Provide empathetic, non-diagnostic insights about mood patterns based on the data provided. Never make medical diagnoses. Always encourage professional help when patterns suggest potential concerns.";

pub const INSIGHT_SYSTEM_PROMPT: &str =
    "You are a supportive mental health companion. Provide brief, encouraging insights.";

/// Token limit for daily insights
pub const INSIGHT_MAX_TOKENS: u32 = 100;

/// Request for a narrative summary of an analysed period
pub fn summary_request(summary: &StructuredSummary) -> Result<CompletionRequest, GeneratorError> {
    let digest = serde_json::to_string_pretty(summary)?;

    let prompt = format!(
        "Analyze this {days}-day mood tracking data and provide a supportive, non-diagnostic summary:

{digest}

Please provide:
1. Overview of mood patterns (stability, fluctuations)
2. Sleep patterns and their relationship to mood
3. Energy level trends
4. Any detected patterns (potential hypomanic or depressive episodes)
5. Gentle recommendations for self-care

Remember: This is for awareness only, not diagnosis. Always recommend consulting healthcare providers.",
        days = summary.total_days,
    );

    Ok(CompletionRequest::new(ANALYSIS_SYSTEM_PROMPT, prompt))
}

/// Request for a one or two sentence insight on today's entry
pub fn daily_insight_request(today: &MoodEntry, previous_average_mood: f64) -> CompletionRequest {
    let prompt = format!(
        "Based on today's mood entry and recent history, provide a brief, encouraging insight:

Today: Mood {mood}/5, Energy: {energy}, Sleep: {sleep}h

Previous 7 days average mood: {average:.2}

Provide a short, supportive message (1-2 sentences) focusing on self-awareness and encouragement.",
        mood = today.mood_rating,
        energy = today.energy_level,
        sleep = today.sleep_hours,
        average = previous_average_mood,
    );

    CompletionRequest::new(INSIGHT_SYSTEM_PROMPT, prompt).with_max_tokens(INSIGHT_MAX_TOKENS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::EntryStatistics;
    use crate::entries::EnergyLevel;
    use chrono::NaiveDate;

    #[test]
    fn test_daily_insight_prompt() {
        let today = MoodEntry::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            2,
            EnergyLevel::High,
            6.5,
        );
        let request = daily_insight_request(&today, -0.5);

        assert_eq!(request.system, INSIGHT_SYSTEM_PROMPT);
        assert_eq!(request.max_tokens, Some(100));
        assert!(request.prompt.contains("Mood 2/5, Energy: high, Sleep: 6.5h"));
        assert!(request.prompt.contains("average mood: -0.50"));
    }

    #[test]
    fn test_summary_prompt_embeds_digest() {
        let summary = StructuredSummary::build(&EntryStatistics::default(), &[]);
        let request = summary_request(&summary).unwrap();

        assert!(request.prompt.starts_with("Analyze this 0-day"));
        assert!(request.prompt.contains("\"risk_factors\": []"));
        assert!(request.max_tokens.is_none());
    }
}
