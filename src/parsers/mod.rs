//! CSV schemas for the listing feed and raw snapshot exports

mod feed;
mod snapshot;

pub use feed::FeedSchema;
pub use snapshot::SnapshotSchema;

use crate::types::{DropfeedError, ParseReport, Result, RowError, RowErrorKind};
use chrono::DateTime;
use std::collections::HashMap;
use tracing::{debug, warn};

/// A typed CSV layout: required columns plus a per-row builder.
///
/// Columns are matched by header name, so column order in the file does not
/// matter. Rows that fail to build are skipped and recorded in the
/// [`ParseReport`]; only a missing required column fails the whole feed.
pub trait CsvSchema {
    type Row;

    /// Schema name for log messages
    fn name(&self) -> &str;

    /// Columns that must be present in the header row
    fn required_columns(&self) -> &[&'static str];

    /// Build a typed row from one record, or describe why it is invalid
    fn build_row(
        &self,
        record: &csv::StringRecord,
        columns: &ColumnIndex,
    ) -> std::result::Result<Self::Row, String>;

    /// Parse a whole CSV document
    fn parse_str(&self, content: &str) -> Result<(Vec<Self::Row>, ParseReport)> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        debug!(schema = self.name(), ?headers, "CSV headers");
        let columns = ColumnIndex::new(&headers, self.required_columns())?;

        let mut rows = Vec::new();
        let mut report = ParseReport::default();

        for (index, result) in reader.records().enumerate() {
            // +1 for 0-based, +1 for header row
            let fallback_line = index + 2;
            report.rows_read += 1;

            let error = match result {
                Ok(record) => {
                    let line = record
                        .position()
                        .map(|p| p.line() as usize)
                        .unwrap_or(fallback_line);
                    match self.build_row(&record, &columns) {
                        Ok(row) => {
                            rows.push(row);
                            report.rows_accepted += 1;
                            continue;
                        }
                        Err(message) => RowError {
                            line,
                            kind: RowErrorKind::Invalid,
                            message,
                        },
                    }
                }
                Err(e) => RowError {
                    line: e
                        .position()
                        .map(|p| p.line() as usize)
                        .unwrap_or(fallback_line),
                    kind: RowErrorKind::Malformed,
                    message: e.to_string(),
                },
            };

            warn!(
                schema = self.name(),
                line = error.line,
                "skipping row: {}",
                error.message
            );
            report.errors.push(error);
        }

        Ok((rows, report))
    }
}

/// Header name → column position
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    /// Index the header row, failing if any required column is absent
    pub fn new(headers: &csv::StringRecord, required: &[&str]) -> Result<Self> {
        let positions: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_string(), i))
            .collect();

        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|col| !positions.contains_key(*col))
            .collect();
        if !missing.is_empty() {
            return Err(DropfeedError::Parse(format!(
                "missing column(s): {}",
                missing.join(", ")
            )));
        }

        Ok(Self { positions })
    }

    /// Raw field value, None when the column is absent or the row is short
    pub fn get<'r>(&self, record: &'r csv::StringRecord, column: &str) -> Option<&'r str> {
        self.positions.get(column).and_then(|&i| record.get(i))
    }
}

// ========== Typed field parsers ==========

/// Required field that may be empty
fn text_field(
    record: &csv::StringRecord,
    columns: &ColumnIndex,
    column: &str,
) -> std::result::Result<String, String> {
    columns
        .get(record, column)
        .map(str::to_string)
        .ok_or_else(|| format!("missing field `{}`", column))
}

/// Required field that must not be empty
fn non_empty_field(
    record: &csv::StringRecord,
    columns: &ColumnIndex,
    column: &str,
) -> std::result::Result<String, String> {
    let value = text_field(record, columns, column)?;
    if value.is_empty() {
        return Err(format!("empty field `{}`", column));
    }
    Ok(value)
}

/// UNIX seconds. Accepts integral floats ("1717000000.0") from spreadsheet exports.
/// Values outside the calendar range are rejected so they never reach grouping.
pub fn parse_timestamp(raw: &str) -> std::result::Result<i64, String> {
    let secs = match raw.parse::<i64>() {
        Ok(secs) => secs,
        Err(_) => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => v as i64,
            _ => return Err(format!("invalid timestamp `{}`", raw)),
        },
    };
    if DateTime::from_timestamp(secs, 0).is_none() {
        return Err(format!("timestamp `{}` out of range", raw));
    }
    Ok(secs)
}

/// Finite number
pub fn parse_price(raw: &str) -> std::result::Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("invalid price `{}`", raw)),
    }
}

/// 0 or 1
pub fn parse_flag(raw: &str) -> std::result::Result<u8, String> {
    match raw.parse::<f64>() {
        Ok(v) if v == 0.0 => Ok(0),
        Ok(v) if v == 1.0 => Ok(1),
        _ => Err(format!("invalid is_new `{}` (expected 0 or 1)", raw)),
    }
}
