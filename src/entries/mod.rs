//! Mood Entries
//!
//! Input side of the analysis pipeline:
//!
//! - **types**: `MoodEntry` and its ordinal enums, plus the validated `EntrySeries`
//! - **store**: The `EntrySource` collaborator and an in-memory implementation
//! - **csv_import**: Loading entries from CSV exports
//! - **error**: Validation errors

pub mod csv_import;
pub mod error;
pub mod store;
pub mod types;

pub use csv_import::{CsvEntryImporter, CsvImportResult};
pub use error::{EntryError, EntryResult};
pub use store::{DateWindow, EntrySource, EntryStore, MemoryEntryStore, SourceError};
pub use types::{EnergyLevel, EntrySeries, GoalActivity, Impairment, MoodEntry};
