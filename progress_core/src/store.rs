//! Daily record persistence with upsert-by-date semantics.
//!
//! Records live in a single CSV file with a fixed column layout. The
//! file is read once, mutated in memory through [`RecordStore::upsert`],
//! and written back in full by [`RecordStore::save`].

use crate::{DailyRecord, Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Column layout of the persisted file, in order
pub const COLUMNS: [&str; 11] = [
    "Date",
    "Breakfast",
    "Snack",
    "Lunch",
    "Dinner",
    "Shake",
    "Water",
    "Exercise",
    "Calories",
    "Protein",
    "Weight",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A row as read from disk; booleans and dates are parsed by hand
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Breakfast")]
    breakfast: String,
    #[serde(rename = "Snack")]
    snack: String,
    #[serde(rename = "Lunch")]
    lunch: String,
    #[serde(rename = "Dinner")]
    dinner: String,
    #[serde(rename = "Shake")]
    shake: String,
    #[serde(rename = "Water")]
    water: String,
    #[serde(rename = "Exercise")]
    exercise: String,
    #[serde(rename = "Calories")]
    calories: f64,
    #[serde(rename = "Protein")]
    protein: f64,
    #[serde(rename = "Weight")]
    weight: Option<f64>,
}

/// A row as written to disk
#[derive(Debug, Serialize)]
struct CsvRowOut {
    date: String,
    breakfast: bool,
    snack: bool,
    lunch: bool,
    dinner: bool,
    shake: bool,
    water: bool,
    exercise: bool,
    calories: f64,
    protein: f64,
    weight: f64,
}

impl From<&DailyRecord> for CsvRowOut {
    fn from(record: &DailyRecord) -> Self {
        CsvRowOut {
            date: record.date.format(DATE_FORMAT).to_string(),
            breakfast: record.breakfast,
            snack: record.snack,
            lunch: record.lunch,
            dinner: record.dinner,
            shake: record.shake,
            water: record.water,
            exercise: record.exercise,
            calories: record.calories,
            protein: record.protein,
            weight: record.weight,
        }
    }
}

impl TryFrom<CsvRow> for DailyRecord {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        Ok(DailyRecord {
            date: parse_date(&row.date)?,
            breakfast: parse_bool("Breakfast", &row.breakfast)?,
            snack: parse_bool("Snack", &row.snack)?,
            lunch: parse_bool("Lunch", &row.lunch)?,
            dinner: parse_bool("Dinner", &row.dinner)?,
            shake: parse_bool("Shake", &row.shake)?,
            water: parse_bool("Water", &row.water)?,
            exercise: parse_bool("Exercise", &row.exercise)?,
            calories: non_negative("Calories", row.calories)?,
            protein: non_negative("Protein", row.protein)?,
            weight: non_negative("Weight", row.weight.unwrap_or(0.0))?,
        })
    }
}

/// Parse an ISO date, tolerating a trailing midnight timestamp
fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .map_err(|e| Error::Store(format!("Invalid date '{}': {}", s, e)))
}

fn parse_bool(column: &str, s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(Error::Store(format!(
            "Invalid boolean '{}' in column {}",
            other, column
        ))),
    }
}

fn non_negative(column: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::Store(format!(
            "Column {} must be a non-negative number, got {}",
            column, value
        )))
    }
}

/// The collection of daily records, kept unique by date and sorted ascending
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<DailyRecord>,
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load records from a file with shared locking
    ///
    /// Returns an empty store if the file doesn't exist. A malformed file
    /// is an error; no rows are silently dropped.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No record file found at {:?}, starting empty", path);
            return Ok(Self::new());
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = Vec::new();
        let read = io::BufReader::new(&file).read_to_end(&mut contents);
        file.unlock()?;
        read?;

        let store = Self::from_reader(contents.as_slice())?;
        tracing::info!("Loaded {} records from {:?}", store.len(), path);
        Ok(store)
    }

    /// Parse records from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if !headers.iter().map(str::trim).eq(COLUMNS.iter().copied()) {
            return Err(Error::Store(format!(
                "Expected columns [{}], found [{}]",
                COLUMNS.join(", "),
                headers.iter().collect::<Vec<_>>().join(", ")
            )));
        }

        let mut store = Self::new();
        for result in reader.records() {
            let raw = result?;
            let line = raw.position().map(|p| p.line()).unwrap_or(0);
            let row: CsvRow = raw.deserialize(Some(&headers))?;
            let record = DailyRecord::try_from(row).map_err(|e| match e {
                Error::Store(msg) => Error::Store(format!("line {}: {}", line, msg)),
                other => other,
            })?;

            if store.get(record.date).is_some() {
                tracing::warn!(
                    "Duplicate entry for {} at line {}, keeping the later row",
                    record.date,
                    line
                );
            }
            store.upsert(record);
        }

        Ok(store)
    }

    /// Insert a record, replacing any existing record for the same date
    ///
    /// The replacement is whole-record; fields are never merged. Returns
    /// the updated collection. Does not persist.
    pub fn upsert(&mut self, record: DailyRecord) -> &[DailyRecord] {
        match self.records.binary_search_by_key(&record.date, |r| r.date) {
            Ok(idx) => {
                tracing::debug!("Replacing entry for {}", record.date);
                self.records[idx] = record;
            }
            Err(idx) => {
                tracing::debug!("Adding entry for {}", record.date);
                self.records.insert(idx, record);
            }
        }
        &self.records
    }

    /// Save all records with exclusive locking
    ///
    /// Atomically writes the file by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = io::BufWriter::new(temp.as_file());
            self.write_to(&mut writer)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::info!("Saved {} records to {:?}", self.len(), path);
        Ok(())
    }

    /// Serialize all records as CSV, header first
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        writer.write_record(COLUMNS)?;
        for record in &self.records {
            writer.serialize(CsvRowOut::from(record))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Load the store, apply `f`, and save it back
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut RecordStore) -> Result<()>,
    {
        let mut store = Self::load(path)?;
        f(&mut store)?;
        store.save(path)?;
        Ok(store)
    }

    /// All records, ascending by date
    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    /// The most recent `n` records, ascending by date
    pub fn last_n(&self, n: usize) -> &[DailyRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.records
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|idx| &self.records[idx])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
