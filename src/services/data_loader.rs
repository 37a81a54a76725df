//! Unified data loading service for CLI and TUI
//!
//! Fetches the feed, parses it against the feed schema, and hands back the
//! typed listings together with the per-row parse report.

use tracing::{info, warn};

use crate::parsers::{CsvSchema, FeedSchema};
use crate::services::FeedSource;
use crate::types::{Listing, ParseReport, Result};

/// Result of one feed load
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub listings: Vec<Listing>,
    pub report: ParseReport,
    /// Human-readable source description
    pub source: String,
}

/// Loads a feed from a single source
pub struct DataLoaderService {
    source: FeedSource,
}

impl DataLoaderService {
    pub fn new(source: FeedSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    /// Fetch and parse. Fetch failures and unusable headers are errors;
    /// bad rows are skipped and counted in the report.
    pub fn load(&self) -> Result<LoadResult> {
        let content = self.source.fetch()?;
        let result = Self::load_from_str(&content, self.source.to_string())?;

        if result.report.skipped() > 0 {
            warn!(
                skipped = result.report.skipped(),
                source = %result.source,
                "feed rows skipped"
            );
        }
        info!(
            rows = result.report.rows_read,
            accepted = result.report.rows_accepted,
            source = %result.source,
            "feed loaded"
        );
        Ok(result)
    }

    /// Parse already-fetched feed text
    pub fn load_from_str(content: &str, source: String) -> Result<LoadResult> {
        let (listings, report) = FeedSchema.parse_str(content)?;
        Ok(LoadResult {
            listings,
            report,
            source,
        })
    }
}
