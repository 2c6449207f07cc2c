//! Entry validation error types
//!
//! Raised at the boundary when entries are checked before analysis.

use chrono::NaiveDate;
use thiserror::Error;

/// An entry violates its field constraints or the series invariants
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntryError {
    #[error("Mood rating {value} on {date} is outside -5..=5")]
    MoodOutOfRange { date: NaiveDate, value: i8 },

    #[error("Sleep hours {value} on {date} is outside 0..=24")]
    SleepOutOfRange { date: NaiveDate, value: f64 },

    #[error("Irritability {value} on {date} is outside 0..=5")]
    IrritabilityOutOfRange { date: NaiveDate, value: u8 },

    #[error("Notes on {date} are {chars} characters long (max 500)")]
    NotesTooLong { date: NaiveDate, chars: usize },

    #[error("Duplicate entry for {0}")]
    DuplicateDate(NaiveDate),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for entry validation
pub type EntryResult<T> = Result<T, EntryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let err = EntryError::MoodOutOfRange { date, value: 7 };
        assert_eq!(err.to_string(), "Mood rating 7 on 2024-01-15 is outside -5..=5");

        let err = EntryError::DuplicateDate(date);
        assert_eq!(err.to_string(), "Duplicate entry for 2024-01-15");
    }
}
