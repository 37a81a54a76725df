//! Listing and grouping types

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_WEEK: i64 = 7 * SECS_PER_DAY;

/// One product listing row from the feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub uuid: String,
    pub item_id: String,
    /// UNIX seconds
    pub timestamp: i64,
    pub price: f64,
    /// Path on the product site, appended to the base URL
    pub url: String,
    pub color: String,
    pub title: String,
    /// 1 = newly listed in this snapshot
    pub is_new: u8,
}

impl Listing {
    pub fn is_novel(&self) -> bool {
        self.is_new == 1
    }

    /// Product page link: base prefix concatenated with the url field
    pub fn product_url(&self, base: &str) -> String {
        format!("{}{}", base, self.url)
    }
}

/// Aggregation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupMode {
    #[default]
    Day,
    Week,
}

impl GroupMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
        }
    }

    pub fn all() -> &'static [GroupMode] {
        &[GroupMode::Day, GroupMode::Week]
    }

    /// Toggle to the other mode
    pub fn toggle(self) -> Self {
        match self {
            Self::Day => Self::Week,
            Self::Week => Self::Day,
        }
    }
}

/// Clock used to turn a UNIX timestamp into a calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateBasis {
    #[default]
    Utc,
    Local,
}

impl DateBasis {
    /// Wall-clock date and time for `timestamp`, or None if out of range
    pub fn date_time(self, timestamp: i64) -> Option<NaiveDateTime> {
        let utc = DateTime::from_timestamp(timestamp, 0)?;
        Some(match self {
            Self::Utc => utc.naive_utc(),
            Self::Local => utc.with_timezone(&Local).naive_local(),
        })
    }

    /// `(year, week)` of `timestamp` on this clock, see [`week_number`]
    pub fn week(self, timestamp: i64) -> Option<(i32, u32)> {
        match self {
            Self::Utc => week_number(timestamp, &Utc),
            Self::Local => week_number(timestamp, &Local),
        }
    }
}

/// Group identifier derived from a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Day(NaiveDate),
    Week { year: i32, week: u32 },
}

impl GroupKey {
    /// Derive the key for `timestamp` in the given mode
    pub fn for_timestamp(timestamp: i64, mode: GroupMode, basis: DateBasis) -> Option<Self> {
        match mode {
            GroupMode::Day => Some(Self::Day(basis.date_time(timestamp)?.date())),
            GroupMode::Week => {
                let (year, week) = basis.week(timestamp)?;
                Some(Self::Week { year, week })
            }
        }
    }

    /// Human-readable label, e.g. "Mar 05, 2024" or "Week 10, 2024"
    pub fn label(&self) -> String {
        match self {
            Self::Day(date) => date.format("%b %d, %Y").to_string(),
            Self::Week { year, week } => format!("Week {}, {}", week, year),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            // Unpadded on purpose: keys must match the published feed pages
            Self::Week { year, week } => write!(f, "{}-W{}", year, week),
        }
    }
}

/// Week number as `ceil((daysSinceJan1 + weekdayOfJan1 + 1) / 7)`.
///
/// `daysSinceJan1` is the absolute time between `timestamp` and 00:00 on
/// January 1st in `tz`, in fractional days, so time of day counts and a DST
/// shift moves the boundary by its offset. The weekday uses Sunday = 0. This
/// is not ISO-8601; a record late on a Saturday can land in the following
/// week. Computed on seconds so the ceiling is exact.
pub fn week_number<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<(i32, u32)> {
    let year = tz.timestamp_opt(timestamp, 0).single()?.year();
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let midnight = jan1.and_hms_opt(0, 0, 0)?;
    // A midnight skipped by a DST gap resolves to the first instant after it
    let start = tz
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())?;

    let elapsed = timestamp - start.timestamp();
    let weekday = jan1.weekday().num_days_from_sunday() as i64;
    let numerator = elapsed + (weekday + 1) * SECS_PER_DAY;
    let week = (numerator + SECS_PER_WEEK - 1) / SECS_PER_WEEK;
    Some((year, u32::try_from(week).ok()?))
}

/// A labeled bucket of listings
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: GroupKey,
    pub items: Vec<Listing>,
}

impl Group {
    pub fn label(&self) -> String {
        self.key.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, LocalResult};

    fn ts(y: i32, m: u32, d: u32, h: u32) -> i64 {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp()
    }

    fn utc_week(timestamp: i64) -> Option<u32> {
        week_number(timestamp, &Utc).map(|(_, week)| week)
    }

    /// US Eastern for early 2024: EST until 2024-03-10 02:00 local, EDT after
    #[derive(Debug, Clone, Copy)]
    struct Eastern2024;

    impl Eastern2024 {
        fn est() -> FixedOffset {
            FixedOffset::west_opt(5 * 3600).unwrap()
        }

        fn edt() -> FixedOffset {
            FixedOffset::west_opt(4 * 3600).unwrap()
        }

        fn switch_local() -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2024, 3, 10)
                .unwrap()
                .and_hms_opt(2, 0, 0)
                .unwrap()
        }
    }

    impl TimeZone for Eastern2024 {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self {
            Eastern2024
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            if *local < Self::switch_local() {
                LocalResult::Single(Self::est())
            } else {
                LocalResult::Single(Self::edt())
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            // 02:00 EST is 07:00 UTC
            if *utc < Self::switch_local() + Duration::hours(5) {
                Self::est()
            } else {
                Self::edt()
            }
        }
    }

    #[test]
    fn test_week_number_first_day() {
        // 2024-01-01 is a Monday
        assert_eq!(utc_week(ts(2024, 1, 1, 0)), Some(1));
        assert_eq!(utc_week(ts(2024, 1, 1, 12)), Some(1));
    }

    #[test]
    fn test_week_number_saturday_boundary() {
        // Midnight Saturday is still week 1; any later time rolls over
        assert_eq!(utc_week(ts(2024, 1, 6, 0)), Some(1));
        assert_eq!(utc_week(ts(2024, 1, 6, 12)), Some(2));
        assert_eq!(utc_week(ts(2024, 1, 7, 0)), Some(2));
    }

    #[test]
    fn test_week_number_mid_year() {
        assert_eq!(utc_week(ts(2024, 2, 27, 12)), Some(9));
        assert_eq!(utc_week(ts(2024, 3, 5, 12)), Some(10));
        assert_eq!(utc_week(ts(2024, 12, 31, 12)), Some(53));
    }

    #[test]
    fn test_week_number_sunday_start_year() {
        // 2023-01-01 is a Sunday (weekday 0)
        assert_eq!(utc_week(ts(2023, 1, 1, 12)), Some(1));
        assert_eq!(utc_week(ts(2023, 1, 7, 12)), Some(2));
    }

    #[test]
    fn test_week_number_year_from_zone() {
        // 2024-01-01 03:00 UTC is still 2023-12-31 in Eastern time
        let (year, week) = week_number(ts(2024, 1, 1, 3), &Eastern2024).unwrap();
        assert_eq!(year, 2023);
        assert_eq!(week, 53);
    }

    #[test]
    fn test_week_number_after_dst_uses_elapsed_time() {
        // Sat 2024-03-16 00:30 EDT. Only 74 days and 23.5 hours have elapsed
        // since Jan 1 00:00 EST, so the Saturday rollover has not happened yet
        let timestamp = 1_710_563_400;
        assert_eq!(week_number(timestamp, &Eastern2024), Some((2024, 11)));

        // Same wall-clock time without the DST shift rolls over to week 12
        let fixed = Eastern2024::edt();
        assert_eq!(week_number(timestamp, &fixed), Some((2024, 12)));
    }

    #[test]
    fn test_group_key_display() {
        let day = GroupKey::for_timestamp(ts(2024, 3, 5, 12), GroupMode::Day, DateBasis::Utc)
            .unwrap();
        assert_eq!(day.to_string(), "2024-03-05");

        let week = GroupKey::for_timestamp(ts(2024, 3, 5, 12), GroupMode::Week, DateBasis::Utc)
            .unwrap();
        assert_eq!(week.to_string(), "2024-W10");

        let early = GroupKey::for_timestamp(ts(2024, 1, 2, 12), GroupMode::Week, DateBasis::Utc)
            .unwrap();
        assert_eq!(early.to_string(), "2024-W1");
    }

    #[test]
    fn test_group_key_local_basis() {
        let timestamp = ts(2024, 3, 5, 12);
        let at = DateBasis::Local.date_time(timestamp).unwrap();

        let day = GroupKey::for_timestamp(timestamp, GroupMode::Day, DateBasis::Local).unwrap();
        assert_eq!(day, GroupKey::Day(at.date()));

        let week = GroupKey::for_timestamp(timestamp, GroupMode::Week, DateBasis::Local).unwrap();
        let (year, number) = week_number(timestamp, &Local).unwrap();
        assert_eq!(week, GroupKey::Week { year, week: number });
        assert_eq!(year, at.year());
    }

    #[test]
    fn test_group_key_labels() {
        let day = GroupKey::Day(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(day.label(), "Mar 05, 2024");

        let week = GroupKey::Week {
            year: 2024,
            week: 10,
        };
        assert_eq!(week.label(), "Week 10, 2024");
    }

    #[test]
    fn test_date_basis_utc() {
        // 2024-03-05T23:30:00Z
        let dt = DateBasis::Utc.date_time(1_709_681_400).unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_group_mode_toggle() {
        assert_eq!(GroupMode::default(), GroupMode::Day);
        assert_eq!(GroupMode::Day.toggle(), GroupMode::Week);
        assert_eq!(GroupMode::Week.toggle(), GroupMode::Day);
    }

    #[test]
    fn test_product_url() {
        let listing = Listing {
            uuid: "H1".into(),
            item_id: "H1".into(),
            timestamp: 0,
            price: 1.0,
            url: "/au/en/product/bag-H1/".into(),
            color: "Black".into(),
            title: "Bag".into(),
            is_new: 1,
        };
        assert_eq!(
            listing.product_url("https://www.hermes.com"),
            "https://www.hermes.com/au/en/product/bag-H1/"
        );
    }
}
