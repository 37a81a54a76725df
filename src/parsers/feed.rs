//! Listing feed schema (`uuid, item_id, timestamp, price, url, color, title, is_new`)

use super::{non_empty_field, parse_flag, parse_price, parse_timestamp, text_field};
use super::{ColumnIndex, CsvSchema};
use crate::types::Listing;

/// Columns every feed must carry
pub const FEED_COLUMNS: [&str; 8] = [
    "uuid",
    "item_id",
    "timestamp",
    "price",
    "url",
    "color",
    "title",
    "is_new",
];

/// Schema for the published listing feed
#[derive(Debug, Default, Clone, Copy)]
pub struct FeedSchema;

impl CsvSchema for FeedSchema {
    type Row = Listing;

    fn name(&self) -> &str {
        "feed"
    }

    fn required_columns(&self) -> &[&'static str] {
        &FEED_COLUMNS
    }

    fn build_row(
        &self,
        record: &csv::StringRecord,
        columns: &ColumnIndex,
    ) -> Result<Listing, String> {
        let item_id = non_empty_field(record, columns, "item_id")?;
        let timestamp = parse_timestamp(&text_field(record, columns, "timestamp")?)?;
        let price = parse_price(&text_field(record, columns, "price")?)?;
        let is_new = parse_flag(&text_field(record, columns, "is_new")?)?;
        let title = non_empty_field(record, columns, "title")?;

        let mut uuid = text_field(record, columns, "uuid")?;
        if uuid.is_empty() {
            uuid = format!("{}{}", item_id, timestamp);
        }

        Ok(Listing {
            uuid,
            item_id,
            timestamp,
            price,
            url: text_field(record, columns, "url")?,
            color: text_field(record, columns, "color")?,
            title,
            is_new,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RowErrorKind;
    use std::path::PathBuf;

    const HEADER: &str = "uuid,item_id,timestamp,price,url,color,title,is_new";

    #[test]
    fn test_parse_valid_rows() {
        let csv = format!(
            "{}\nA1709640000,A,1709640000,12500,/p/a/,Black,Bag,1\nB1709640000,B,1709640000,890,/p/b/,Tan,Belt,0\n",
            HEADER
        );
        let (rows, report) = FeedSchema.parse_str(&csv).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(report.rows_read, 2);
        assert_eq!(report.rows_accepted, 2);
        assert_eq!(report.skipped(), 0);

        assert_eq!(rows[0].uuid, "A1709640000");
        assert_eq!(rows[0].item_id, "A");
        assert_eq!(rows[0].timestamp, 1_709_640_000);
        assert!((rows[0].price - 12500.0).abs() < f64::EPSILON);
        assert_eq!(rows[0].url, "/p/a/");
        assert_eq!(rows[0].color, "Black");
        assert_eq!(rows[0].title, "Bag");
        assert!(rows[0].is_novel());
        assert!(!rows[1].is_novel());
    }

    #[test]
    fn test_parse_export_column_order() {
        // Export job writes columns in a different order
        let csv = "uuid,item_id,timestamp,title,color,url,price,is_new\n\
                   A1,A,1709640000,Bag,Black,/p/a/,12500,1\n";
        let (rows, report) = FeedSchema.parse_str(csv).unwrap();

        assert_eq!(report.skipped(), 0);
        assert_eq!(rows[0].title, "Bag");
        assert_eq!(rows[0].color, "Black");
        assert_eq!(rows[0].url, "/p/a/");
    }

    #[test]
    fn test_invalid_rows_are_skipped() {
        let csv = format!(
            "{}\n\
             A1,A,not-a-time,100,/a,Black,Bag,1\n\
             B1,B,1709640000,100,/b,Tan,Belt,1\n\
             C1,C,1709640000,free,/c,Red,Scarf,1\n\
             D1,D,1709640000,100,/d,Red,Scarf,7\n\
             E1,,1709640000,100,/e,Red,Scarf,1\n",
            HEADER
        );
        let (rows, report) = FeedSchema.parse_str(&csv).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item_id, "B");
        assert_eq!(report.rows_read, 5);
        assert_eq!(report.rows_accepted, 1);
        assert_eq!(report.skipped(), 4);

        let first = &report.errors[0];
        assert_eq!(first.line, 2);
        assert_eq!(first.kind, RowErrorKind::Invalid);
        assert!(first.message.contains("timestamp"));
        assert!(report.errors[3].message.contains("item_id"));
    }

    #[test]
    fn test_unrepresentable_timestamp_is_skipped() {
        use crate::services::Aggregator;
        use crate::types::{DateBasis, GroupMode};

        let csv = format!(
            "{}\n\
             A1,A,99999999999999999,100,/a,Black,Bag,1\n\
             B1,B,1709640000,100,/b,Tan,Belt,1\n",
            HEADER
        );
        let (rows, report) = FeedSchema.parse_str(&csv).unwrap();

        assert_eq!(report.rows_accepted, 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.errors[0].line, 2);
        assert_eq!(report.errors[0].kind, RowErrorKind::Invalid);
        assert!(report.errors[0].message.contains("out of range"));

        // Every row is either counted as skipped or shows up in a group
        for mode in GroupMode::all() {
            let groups = Aggregator::group(&rows, *mode, DateBasis::Utc);
            assert_eq!(
                report.skipped() + Aggregator::item_count(&groups),
                report.rows_read
            );
        }
    }

    #[test]
    fn test_short_row_is_malformed() {
        let csv = format!("{}\nA1,A,1709640000\n", HEADER);
        let (rows, report) = FeedSchema.parse_str(&csv).unwrap();

        assert!(rows.is_empty());
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.errors[0].kind, RowErrorKind::Malformed);
    }

    #[test]
    fn test_trailing_blank_lines_ignored() {
        let csv = format!("{}\nA1,A,1709640000,100,/a,Black,Bag,1\n\n\n", HEADER);
        let (rows, report) = FeedSchema.parse_str(&csv).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(report.rows_read, 1);
        assert_eq!(report.skipped(), 0);
    }

    #[test]
    fn test_empty_uuid_is_derived() {
        let csv = format!("{}\n,A,1709640000,100,/a,Black,Bag,1\n", HEADER);
        let (rows, _) = FeedSchema.parse_str(&csv).unwrap();

        assert_eq!(rows[0].uuid, "A1709640000");
    }

    #[test]
    fn test_missing_column_fails_feed() {
        let csv = "uuid,item_id,timestamp,price\nA1,A,1709640000,100\n";
        let err = FeedSchema.parse_str(csv).unwrap_err();

        assert!(err.to_string().contains("url"));
        assert!(err.to_string().contains("is_new"));
    }

    #[test]
    fn test_empty_document_fails_feed() {
        assert!(FeedSchema.parse_str("").is_err());
    }

    #[test]
    fn test_parse_fixture() {
        let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("feed-sample.csv");
        let content = std::fs::read_to_string(fixture).unwrap();

        let (rows, report) = FeedSchema.parse_str(&content).unwrap();

        assert_eq!(report.rows_read, 12);
        assert_eq!(report.skipped(), 1);
        assert_eq!(rows.len(), 11);
    }
}
