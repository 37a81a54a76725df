//! Type definitions for dropfeed

mod error;
mod listing;

pub use error::*;
pub use listing::*;

/// Why a feed row was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowErrorKind {
    /// CSV-level failure (wrong field count, bad UTF-8, type mismatch)
    Malformed,
    /// Row decoded but a field failed validation
    Invalid,
}

/// A single skipped row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line number in the feed (header is line 1)
    pub line: usize,
    pub kind: RowErrorKind,
    pub message: String,
}

/// Outcome of parsing one feed: how many rows were read and which were skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub rows_read: usize,
    pub rows_accepted: usize,
    pub errors: Vec<RowError>,
}

impl ParseReport {
    pub fn skipped(&self) -> usize {
        self.errors.len()
    }
}
