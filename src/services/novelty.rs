//! Novelty marking for raw inventory snapshots
//!
//! Snapshots are taken repeatedly; an item is "new" only in the first
//! snapshot where its `item_id` appears.

use crate::types::{Listing, Result};
use std::collections::HashSet;
use std::io::Write;

/// Column order of a marked export
pub const EXPORT_COLUMNS: [&str; 8] = [
    "uuid",
    "item_id",
    "timestamp",
    "title",
    "color",
    "url",
    "price",
    "is_new",
];

/// Sort by timestamp (stable) and flag first appearances
pub fn mark_new(mut rows: Vec<Listing>) -> Vec<Listing> {
    rows.sort_by_key(|r| r.timestamp);

    let mut seen: HashSet<String> = HashSet::new();
    for row in &mut rows {
        row.is_new = u8::from(seen.insert(row.item_id.clone()));
    }
    rows
}

/// Write rows as a feed CSV in export column order
pub fn write_export<W: Write>(rows: &[Listing], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_COLUMNS)?;

    for row in rows {
        let timestamp = row.timestamp.to_string();
        let price = format_price(row.price);
        let is_new = row.is_new.to_string();
        csv_writer.write_record([
            row.uuid.as_str(),
            row.item_id.as_str(),
            timestamp.as_str(),
            row.title.as_str(),
            row.color.as_str(),
            row.url.as_str(),
            price.as_str(),
            is_new.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Integral prices print without a fraction ("12500", not "12500.0")
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 && price.abs() < 1e15 {
        format!("{}", price as i64)
    } else {
        price.to_string()
    }
}
