//! Raw inventory snapshot schema, as exported before novelty is known

use super::{non_empty_field, parse_price, parse_timestamp, text_field};
use super::{ColumnIndex, CsvSchema};
use crate::types::Listing;

/// Columns a snapshot export must carry. `uuid` is optional.
pub const SNAPSHOT_COLUMNS: [&str; 6] = ["item_id", "timestamp", "title", "color", "url", "price"];

/// Schema for snapshot rows; every row comes back with `is_new = 0`
#[derive(Debug, Default, Clone, Copy)]
pub struct SnapshotSchema;

impl CsvSchema for SnapshotSchema {
    type Row = Listing;

    fn name(&self) -> &str {
        "snapshot"
    }

    fn required_columns(&self) -> &[&'static str] {
        &SNAPSHOT_COLUMNS
    }

    fn build_row(
        &self,
        record: &csv::StringRecord,
        columns: &ColumnIndex,
    ) -> Result<Listing, String> {
        let item_id = non_empty_field(record, columns, "item_id")?;
        let timestamp = parse_timestamp(&text_field(record, columns, "timestamp")?)?;
        let price = parse_price(&text_field(record, columns, "price")?)?;

        let uuid = columns
            .get(record, "uuid")
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}{}", item_id, timestamp));

        Ok(Listing {
            uuid,
            item_id,
            timestamp,
            price,
            url: text_field(record, columns, "url")?,
            color: text_field(record, columns, "color")?,
            title: non_empty_field(record, columns, "title")?,
            is_new: 0,
        })
    }
}
