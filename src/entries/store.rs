//! Entry Sources
//!
//! The analysis engine never reads storage itself. It is handed entries by an
//! [`EntrySource`], which returns one user's entries for a date window already
//! sorted and deduplicated by date. [`MemoryEntryStore`] is the in-process
//! implementation used by the API server and tests.

use super::error::EntryError;
use super::types::MoodEntry;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// An inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Create a window; `start` and `end` are swapped if given in reverse
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// The `days` calendar days ending at (and including) `end`
    ///
    /// The start is clamped to [`NaiveDate::MIN`] near the edge of the calendar.
    pub fn last_days(days: i64, end: NaiveDate) -> Self {
        let span = (days.max(1) - 1).min(365 * 100);
        let start = end
            .checked_sub_signed(Duration::days(span))
            .unwrap_or(NaiveDate::MIN);
        Self::new(start, end)
    }

    /// Every representable day
    pub fn all() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Supplies entries for one user within a date window
#[async_trait]
pub trait EntrySource: Send + Sync {
    /// Fetch entries in ascending date order, at most one per date
    async fn fetch(&self, user_id: &str, window: DateWindow) -> Result<Vec<MoodEntry>, SourceError>;
}

/// An entry source that also accepts writes
#[async_trait]
pub trait EntryStore: EntrySource {
    /// Insert or replace the entry for its date, returning the replaced entry
    async fn upsert(&self, user_id: &str, entry: MoodEntry) -> Result<Option<MoodEntry>, SourceError>;

    /// Delete the entry for a date, returning it if one existed
    async fn remove(&self, user_id: &str, date: NaiveDate) -> Result<Option<MoodEntry>, SourceError>;

    /// Number of entries stored for a user
    async fn count(&self, user_id: &str) -> Result<usize, SourceError>;
}

/// In-memory entry store keyed by user and date
#[derive(Default)]
pub struct MemoryEntryStore {
    users: RwLock<HashMap<String, BTreeMap<NaiveDate, MoodEntry>>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with at least one entry
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl EntrySource for MemoryEntryStore {
    async fn fetch(&self, user_id: &str, window: DateWindow) -> Result<Vec<MoodEntry>, SourceError> {
        let users = self.users.read().await;

        let entries = users
            .get(user_id)
            .map(|days| {
                days.range(window.start..=window.end)
                    .map(|(_, entry)| entry.clone())
                    .collect()
            })
            .unwrap_or_default();

        Ok(entries)
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn upsert(&self, user_id: &str, entry: MoodEntry) -> Result<Option<MoodEntry>, SourceError> {
        entry.validate()?;

        let mut users = self.users.write().await;
        let replaced = users
            .entry(user_id.to_string())
            .or_default()
            .insert(entry.date, entry);

        Ok(replaced)
    }

    async fn remove(&self, user_id: &str, date: NaiveDate) -> Result<Option<MoodEntry>, SourceError> {
        let mut users = self.users.write().await;
        let Some(days) = users.get_mut(user_id) else {
            return Ok(None);
        };

        let removed = days.remove(&date);
        if days.is_empty() {
            users.remove(user_id);
        }
        Ok(removed)
    }

    async fn count(&self, user_id: &str) -> Result<usize, SourceError> {
        let users = self.users.read().await;
        Ok(users.get(user_id).map(|days| days.len()).unwrap_or(0))
    }
}

/// Errors raised by entry sources
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Invalid entry: {0}")]
    InvalidEntry(#[from] EntryError),

    #[error("Entry backend error: {0}")]
    Backend(String),
}
