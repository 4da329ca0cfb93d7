//! Time parsing and formatting.
//!
//! Handles permissive parsing of user-entered date/times and the
//! ISO 8601 formatting used for service requests and validity windows.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parses a user-entered time. Accepts a bare date, date plus hours,
/// minutes, or full seconds (with optional fractional part), separated
/// by 'T' or a space, with or without a trailing 'Z'. Times are UTC.
pub fn parse_user_time(input: &str) -> Option<DateTime<Utc>> {
    let trimmed = input.trim().trim_end_matches(['z', 'Z']);
    if trimmed.is_empty() {
        return None;
    }
    let normalized = trimmed.replacen(' ', "T", 1);

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }

    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}

/// Parses a timestamp as returned by the SSC service, e.g.
/// "1990-02-26T00:00:00.000Z" or without fractional seconds.
pub fn parse_service_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| parse_user_time(value))
}

/// Formats a time as the ISO 8601 instant the service expects.
pub fn format_request_time(time: DateTime<Utc>) -> String {
    format!("{}Z", time.format(TIME_FMT))
}

/// Formats a validity window for display, without fractional seconds
/// or timezone suffix.
pub fn format_window(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!("{} to {}", start.format(TIME_FMT), end.format(TIME_FMT))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn parses_bare_date() {
        assert_eq!(parse_user_time("2020-06-01"), Some(utc(2020, 6, 1, 0, 0, 0)));
    }

    #[test]
    fn parses_partial_times() {
        assert_eq!(parse_user_time("2020-06-01T12"), Some(utc(2020, 6, 1, 12, 0, 0)));
        assert_eq!(parse_user_time("2020-06-01T12:30"), Some(utc(2020, 6, 1, 12, 30, 0)));
        assert_eq!(parse_user_time("2020-06-01 12:30:45"), Some(utc(2020, 6, 1, 12, 30, 45)));
    }

    #[test]
    fn parses_full_iso_with_suffix() {
        assert_eq!(
            parse_user_time("2020-06-01T12:30:45.000Z"),
            Some(utc(2020, 6, 1, 12, 30, 45))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_user_time("not-a-date"), None);
        assert_eq!(parse_user_time(""), None);
        assert_eq!(parse_user_time("2020-13-40"), None);
    }

    #[test]
    fn parse_is_idempotent_on_iso_output() {
        let parsed = parse_user_time("2020-06-01T06:07:08").unwrap();
        let reparsed = parse_user_time(&format_request_time(parsed)).unwrap();
        assert_eq!(parsed, reparsed);
    }

    #[test]
    fn parses_service_timestamps() {
        assert_eq!(
            parse_service_time("1990-02-26T00:00:00.000Z"),
            Some(utc(1990, 2, 26, 0, 0, 0))
        );
        assert_eq!(
            parse_service_time("2020-06-01T00:00:00"),
            Some(utc(2020, 6, 1, 0, 0, 0))
        );
    }

    #[test]
    fn formats_window_without_fractional_seconds() {
        let window = format_window(utc(1990, 2, 26, 0, 0, 0), utc(2019, 12, 31, 23, 59, 59));
        assert_eq!(window, "1990-02-26T00:00:00 to 2019-12-31T23:59:59");
    }
}
