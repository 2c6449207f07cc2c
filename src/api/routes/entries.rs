//! Entry Routes
//!
//! - POST /api/v1/users/:user_id/entries - Create or replace the entry for a date
//! - GET /api/v1/users/:user_id/entries - Entries in a date window
//! - GET /api/v1/users/:user_id/entries/today - Today's entry, if logged
//! - DELETE /api/v1/users/:user_id/entries/:date - Delete the entry for a date

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use std::sync::Arc;

use super::{load_series, today, validate_user_id, window_ending};
use crate::analysis::Streaks;
use crate::api::dto::{
    CreateEntryResponse, DateQuery, DeleteEntryResponse, EntriesResponse, EntryQuery, TodayResponse,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::entries::{DateWindow, MoodEntry};

/// POST /api/v1/users/:user_id/entries
///
/// Entries are keyed by date; posting the same date again replaces it.
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(entry): Json<MoodEntry>,
) -> ApiResult<(StatusCode, Json<CreateEntryResponse>)> {
    validate_user_id(&user_id)?;

    let replaced = state.store.upsert(&user_id, entry.clone()).await?;

    let history = load_series(&state, &user_id, DateWindow::all()).await?;
    let streak = Streaks::compute(history.entries());

    tracing::info!(
        user_id = %user_id,
        date = %entry.date,
        replaced = replaced.is_some(),
        streak = streak.current,
        "Entry stored"
    );

    let status = if replaced.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((
        status,
        Json(CreateEntryResponse {
            entry,
            replaced: replaced.is_some(),
            streak,
        }),
    ))
}

/// GET /api/v1/users/:user_id/entries?start=&end=
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<EntryQuery>,
) -> ApiResult<Json<EntriesResponse>> {
    validate_user_id(&user_id)?;

    let window = match (query.start, query.end) {
        (Some(start), end) => {
            let end = end.unwrap_or_else(today);
            if start > end {
                return Err(ApiError::Validation("start must not be after end".to_string()));
            }
            DateWindow::new(start, end)
        }
        (None, end) => window_ending(&state, None, end)?,
    };

    let entries = state.store.fetch(&user_id, window).await?;

    Ok(Json(EntriesResponse {
        start: window.start,
        end: window.end,
        count: entries.len(),
        entries,
    }))
}

/// GET /api/v1/users/:user_id/entries/today?date=
pub async fn today_entry(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<TodayResponse>> {
    validate_user_id(&user_id)?;

    let date = query.date.unwrap_or_else(today);
    let entry = state
        .store
        .fetch(&user_id, DateWindow::new(date, date))
        .await?
        .into_iter()
        .next();

    Ok(Json(TodayResponse {
        date,
        has_entry: entry.is_some(),
        entry,
    }))
}

/// DELETE /api/v1/users/:user_id/entries/:date
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path((user_id, date)): Path<(String, NaiveDate)>,
) -> ApiResult<Json<DeleteEntryResponse>> {
    validate_user_id(&user_id)?;

    let deleted = state
        .store
        .remove(&user_id, date)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No entry for {}", date)))?;

    tracing::info!(user_id = %user_id, date = %date, "Entry deleted");

    Ok(Json(DeleteEntryResponse { deleted }))
}
