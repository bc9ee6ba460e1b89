//! # Temporal Types — UTC Timestamps and SFAF Dates
//!
//! `Timestamp` is a UTC-only instant truncated to seconds. Exports stamp the
//! `Generated:` header with [`Timestamp::to_sfaf_date`] (`YYYY-MM-DD`);
//! compliance reports use [`Timestamp::to_iso8601`].
//!
//! Date-valued SFAF fields (140–143, 019) use the compact `YYYYMMDD` form,
//! parsed by [`parse_sfaf_date`] into a calendar date.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SfafError;

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 string with a `Z` suffix.
    pub fn parse(s: &str) -> Result<Self, SfafError> {
        if !s.ends_with('Z') {
            return Err(SfafError::Timestamp(format!(
                "must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| SfafError::Timestamp(format!("{s:?}: {e}")))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// `YYYY-MM-DD`, as used in the export header.
    pub fn to_sfaf_date(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// Parse a compact `YYYYMMDD` field value into a calendar date.
///
/// Returns `None` for anything that is not eight digits naming a real date
/// (`20240230` is rejected).
pub fn parse_sfaf_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y%m%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_sfaf_date_format() {
        let ts = Timestamp::from_utc(Utc.with_ymd_and_hms(2026, 3, 7, 23, 59, 59).unwrap());
        assert_eq!(ts.to_sfaf_date(), "2026-03-07");
        assert_eq!(ts.to_iso8601(), "2026-03-07T23:59:59Z");
        assert_eq!(ts.year(), 2026);
    }

    #[test]
    fn test_parse_requires_z() {
        assert!(Timestamp::parse("2026-01-15T12:00:00Z").is_ok());
        assert!(Timestamp::parse("2026-01-15T12:00:00+00:00").is_err());
        assert!(Timestamp::parse("2026-01-15").is_err());
    }

    #[test]
    fn test_parse_sfaf_date() {
        assert_eq!(
            parse_sfaf_date("20240229"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert!(parse_sfaf_date("20230229").is_none());
        assert!(parse_sfaf_date("2024-02-29").is_none());
        assert!(parse_sfaf_date("202402").is_none());
        assert!(parse_sfaf_date("2024022A").is_none());
    }

    #[test]
    fn test_serde_roundtrip() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }
}
