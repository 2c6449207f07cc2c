//! API Routes
//!
//! Route handlers organized by functionality.

pub mod analysis;
pub mod entries;
pub mod health;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::entries::{DateWindow, EntrySeries};
use chrono::NaiveDate;

/// Longest window a request may ask for
const MAX_WINDOW_DAYS: i64 = 3660;

/// Longest accepted user id
const MAX_USER_ID_LEN: usize = 128;

/// Current local calendar day
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Window of `days` ending at `end`, defaulting to the configured window and today
pub(crate) fn window_ending(
    state: &AppState,
    days: Option<i64>,
    end: Option<NaiveDate>,
) -> ApiResult<DateWindow> {
    let days = days.unwrap_or(state.config.window_days);
    if !(1..=MAX_WINDOW_DAYS).contains(&days) {
        return Err(ApiError::Validation(format!(
            "window_days must be between 1 and {}",
            MAX_WINDOW_DAYS
        )));
    }

    Ok(DateWindow::last_days(days, end.unwrap_or_else(today)))
}

/// Reject blank or oversized user ids; every per-user route checks this first
pub(crate) fn validate_user_id(user_id: &str) -> ApiResult<()> {
    if user_id.trim().is_empty() {
        return Err(ApiError::Validation("user_id must not be empty".to_string()));
    }
    if user_id.len() > MAX_USER_ID_LEN {
        return Err(ApiError::Validation(format!(
            "user_id exceeds maximum length of {}",
            MAX_USER_ID_LEN
        )));
    }
    Ok(())
}

/// Fetch a user's entries as a validated series
pub(crate) async fn load_series(
    state: &AppState,
    user_id: &str,
    window: DateWindow,
) -> ApiResult<EntrySeries> {
    validate_user_id(user_id)?;
    let entries = state.store.fetch(user_id, window).await?;

    // The store only holds validated entries, so a failure here is a store bug
    EntrySeries::new(entries)
        .map_err(|e| ApiError::Internal(format!("Stored entries are inconsistent: {}", e)))
}
