//! Analysis Routes
//!
//! - GET /api/v1/users/:user_id/analysis/patterns - Rule-based pattern analysis
//! - GET /api/v1/users/:user_id/analysis/summary - Analysis with external summary
//! - GET /api/v1/users/:user_id/analysis/daily-insight - Insight on today's entry
//! - GET /api/v1/users/:user_id/stats - Dashboard statistics
//!
//! None of these fail because of the analysis itself: too little data is a
//! normal result, and generator failures fall back to rule-based text.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use std::sync::Arc;

use super::{load_series, today, window_ending};
use crate::analysis::AnalysisResult;
use crate::api::dto::{AnalysisQuery, DailyInsightResponse, DateQuery, StatsResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::entries::DateWindow;

/// Reported when the summary route runs without a generator
const GENERATOR_DISABLED: &str = "External summary generator is not configured";

/// GET /api/v1/users/:user_id/analysis/patterns
pub async fn patterns(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> ApiResult<Json<AnalysisResult>> {
    let window = window_ending(&state, query.window_days, query.date)?;
    let series = load_series(&state, &user_id, window).await?;

    Ok(Json(state.engine.analyze(&series)))
}

/// GET /api/v1/users/:user_id/analysis/summary
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> ApiResult<Json<AnalysisResult>> {
    let window = window_ending(&state, query.window_days, query.date)?;
    let series = load_series(&state, &user_id, window).await?;

    let result = match &state.generator {
        Some(generator) => {
            state
                .engine
                .analyze_with_generator(&series, generator.as_ref())
                .await
        }
        None => {
            let mut result = state.engine.analyze(&series);
            if result.is_complete() {
                result.generator_error = Some(GENERATOR_DISABLED.to_string());
            }
            result
        }
    };

    Ok(Json(result))
}

/// GET /api/v1/users/:user_id/analysis/daily-insight?date=
pub async fn daily_insight(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<DailyInsightResponse>> {
    let date = query.date.unwrap_or_else(today);
    let series = load_series(&state, &user_id, DateWindow::new(NaiveDate::MIN, date)).await?;

    let insight = state
        .engine
        .daily_insight(
            series.get(date),
            series.before(date),
            state.generator.as_deref(),
        )
        .await;

    Ok(Json(DailyInsightResponse { date, insight }))
}

/// GET /api/v1/users/:user_id/stats
///
/// No minimum entry count; an unknown user gets neutral statistics.
pub async fn stats(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> ApiResult<Json<StatsResponse>> {
    let window = window_ending(&state, query.window_days, query.date)?;
    let series = load_series(&state, &user_id, window).await?;

    Ok(Json(StatsResponse {
        start: window.start,
        end: window.end,
        snapshot: state.engine.snapshot(&series),
    }))
}
