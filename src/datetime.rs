//! Date parsing for bound fields and the `Date` validator.
//!
//! Parsing is strict about the calendar: `2023-02-30` is rejected rather
//! than rolled over into March.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%d-%m-%Y", "%m/%d/%Y"];

/// Parse a date or date-time string.
///
/// Supports RFC 3339, RFC 2822, ISO date-times with `T` or space separator and
/// a few common date-only layouts. Surrounding whitespace is ignored; blank
/// input never parses.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(nd) = NaiveDateTime::parse_from_str(s, format) {
            return Some(nd);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Format a date the way views display it (`YYYY-MM-DD`).
pub fn format_date(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        let dt = parse_date("2023-02-28").unwrap();
        assert_eq!(format_date(&dt), "2023-02-28");
    }

    #[test]
    fn test_invalid_calendar_date_is_rejected() {
        assert!(parse_date("2023-02-30").is_none());
        assert!(parse_date("2023-13-01").is_none());
    }

    #[test]
    fn test_parse_datetime_variants() {
        assert!(parse_date("2024-01-15T10:30:00Z").is_some());
        assert!(parse_date("2024-01-15 10:30:00").is_some());
        assert!(parse_date("  15.01.2024 ").is_some());
    }

    #[test]
    fn test_garbage_and_blank() {
        assert!(parse_date("not-a-date").is_none());
        assert!(parse_date("   ").is_none());
    }
}
