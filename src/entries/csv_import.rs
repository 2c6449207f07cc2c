//! CSV Import
//!
//! Loads mood entries from CSV exports. Columns are matched by header name
//! (snake_case or camelCase), dates accept several common formats, and rows
//! that fail to parse or validate are reported per line instead of aborting
//! the import.

use super::error::EntryError;
use super::types::{EnergyLevel, GoalActivity, Impairment, MoodEntry};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

const MAX_REPORTED_ERRORS: usize = 100;

/// Column indices resolved from the header row
#[derive(Debug, Default)]
struct ColumnMap {
    date: Option<usize>,
    mood: Option<usize>,
    energy: Option<usize>,
    sleep: Option<usize>,
    irritability: Option<usize>,
    risky: Option<usize>,
    impulsivity: Option<usize>,
    activity: Option<usize>,
    impairment: Option<usize>,
    notes: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut map = ColumnMap::default();

        for (idx, header) in headers.iter().enumerate() {
            let key: String = header
                .trim()
                .to_lowercase()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect();

            let slot = match key.as_str() {
                "date" | "day" | "timestamp" => &mut map.date,
                "mood" | "moodrating" => &mut map.mood,
                "energy" | "energylevel" => &mut map.energy,
                "sleep" | "sleephours" => &mut map.sleep,
                "irritability" => &mut map.irritability,
                "risky" | "riskybehavior" => &mut map.risky,
                "impulsive" | "impulsivity" => &mut map.impulsivity,
                "activity" | "goaldirectedactivity" => &mut map.activity,
                "impairment" | "functionalimpairment" => &mut map.impairment,
                "notes" | "note" => &mut map.notes,
                _ => continue,
            };

            if slot.is_none() {
                *slot = Some(idx);
            }
        }

        map
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.date.is_none() {
            missing.push("date");
        }
        if self.mood.is_none() {
            missing.push("mood_rating");
        }
        if self.energy.is_none() {
            missing.push("energy_level");
        }
        if self.sleep.is_none() {
            missing.push("sleep_hours");
        }
        missing
    }
}

/// CSV importer for mood entries
pub struct CsvEntryImporter {
    /// Preferred format for the date column
    date_format: String,
}

/// Result of a CSV import operation
#[derive(Debug, Default)]
pub struct CsvImportResult {
    /// Valid entries in file order
    pub entries: Vec<MoodEntry>,
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

impl Default for CsvEntryImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvEntryImporter {
    pub fn new() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
        }
    }

    /// Set the preferred date format string
    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }

    /// Import entries from a CSV file
    pub fn import(&self, path: &Path) -> Result<CsvImportResult, EntryError> {
        let file = std::fs::File::open(path)
            .map_err(|e| EntryError::Parse(format!("{}: {}", path.display(), e)))?;
        self.import_reader(file)
    }

    /// Import entries from a CSV string
    pub fn import_str(&self, csv_data: &str) -> Result<CsvImportResult, EntryError> {
        self.import_reader(csv_data.as_bytes())
    }

    fn import_reader<R: Read>(&self, reader: R) -> Result<CsvImportResult, EntryError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| EntryError::Parse(e.to_string()))?
            .clone();
        let columns = ColumnMap::from_headers(&headers);

        let missing = columns.missing_required();
        if !missing.is_empty() {
            return Err(EntryError::Parse(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }

        let mut result = CsvImportResult::default();
        let mut seen_dates = HashSet::new();

        for (line_num, record) in reader.records().enumerate() {
            // Header is line 1
            let line = line_num + 2;

            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    result.errors.push(format!("Line {}: {}", line, e));
                    result.rows_failed += 1;
                    continue;
                }
            };

            let entry = self
                .parse_record(&record, &columns)
                .and_then(|entry| entry.validate().map(|_| entry));

            match entry {
                Ok(entry) if !seen_dates.insert(entry.date) => {
                    result.errors.push(format!(
                        "Line {}: {}",
                        line,
                        EntryError::DuplicateDate(entry.date)
                    ));
                    result.rows_failed += 1;
                }
                Ok(entry) => {
                    result.entries.push(entry);
                    result.rows_processed += 1;
                }
                Err(e) => {
                    result.errors.push(format!("Line {}: {}", line, e));
                    result.rows_failed += 1;
                }
            }
        }

        if result.errors.len() > MAX_REPORTED_ERRORS {
            let total = result.errors.len();
            result.errors.truncate(MAX_REPORTED_ERRORS);
            result
                .errors
                .push(format!("... and {} more errors", total - MAX_REPORTED_ERRORS));
        }

        tracing::debug!(
            imported = result.rows_processed,
            failed = result.rows_failed,
            "CSV import finished"
        );

        Ok(result)
    }

    fn parse_record(&self, record: &csv::StringRecord, columns: &ColumnMap) -> Result<MoodEntry, EntryError> {
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).filter(|s| !s.is_empty());
        let required = |idx: Option<usize>, name: &str| {
            field(idx).ok_or_else(|| EntryError::Parse(format!("missing {}", name)))
        };

        let date = self.parse_date(required(columns.date, "date")?)?;

        let mood_str = required(columns.mood, "mood_rating")?;
        let mood_rating = mood_str
            .parse::<i8>()
            .map_err(|_| EntryError::Parse(format!("invalid mood rating: {}", mood_str)))?;

        let energy_level: EnergyLevel = required(columns.energy, "energy_level")?.parse()?;

        let sleep_str = required(columns.sleep, "sleep_hours")?;
        let sleep_hours = sleep_str
            .parse::<f64>()
            .map_err(|_| EntryError::Parse(format!("invalid sleep hours: {}", sleep_str)))?;

        let mut entry = MoodEntry::new(date, mood_rating, energy_level, sleep_hours);

        if let Some(s) = field(columns.irritability) {
            entry.irritability = s
                .parse()
                .map_err(|_| EntryError::Parse(format!("invalid irritability: {}", s)))?;
        }
        if let Some(s) = field(columns.risky) {
            entry.risky_behavior = parse_flag(s)?;
        }
        if let Some(s) = field(columns.impulsivity) {
            entry.impulsivity = parse_flag(s)?;
        }
        if let Some(s) = field(columns.activity) {
            entry.goal_directed_activity = s.parse::<GoalActivity>()?;
        }
        if let Some(s) = field(columns.impairment) {
            entry.functional_impairment = s.parse::<Impairment>()?;
        }
        if let Some(s) = field(columns.notes) {
            entry.notes = Some(s.to_string());
        }

        Ok(entry)
    }

    /// Parse a date string using the configured format, then common fallbacks
    fn parse_date(&self, s: &str) -> Result<NaiveDate, EntryError> {
        if let Ok(date) = NaiveDate::parse_from_str(s, &self.date_format) {
            return Ok(date);
        }

        let formats = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d.%m.%Y"];
        for fmt in formats {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Ok(date);
            }
        }

        let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
        for fmt in datetime_formats {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(dt.date());
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.date_naive());
        }

        Err(EntryError::Parse(format!("could not parse date: {}", s)))
    }
}

fn parse_flag(s: &str) -> Result<bool, EntryError> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        other => Err(EntryError::Parse(format!("invalid boolean: {}", other))),
    }
}
