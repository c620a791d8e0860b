use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{Error, Result};

/// Wire format for timestamps sent to the server.
pub const ISO8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse a user-supplied ISO-8601 timestamp and normalize it to UTC.
///
/// Accepted forms:
/// - RFC 3339 with an offset: `2024-03-01T06:00:00Z`, `2024-03-01T08:00:00+02:00`
/// - naive date-time, read as UTC: `2024-03-01T06:00:00`, `2024-03-01 06:00:00`
///   or without seconds, `2024-03-01T06:00`
/// - bare date, read as midnight UTC: `2024-03-01`
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let trimmed = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(ndt.and_utc());
        }
    }

    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(ndt) = d.and_hms_opt(0, 0, 0) {
            return Ok(ndt.and_utc());
        }
    }

    Err(Error::Configuration(format!(
        "unsupported timestamp '{trimmed}', expected ISO-8601 such as 2024-03-01T06:00:00Z"
    )))
}

pub fn format_iso8601(dt: &DateTime<Utc>) -> String {
    dt.format(ISO8601_FORMAT).to_string()
}

/// Server timestamps are RFC 3339; an empty element means "not reported".
pub(crate) fn parse_server_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|ndt| ndt.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_and_normalizes_offset() {
        let dt = parse_timestamp("2024-03-01T08:00:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap());
    }

    #[test]
    fn naive_forms_are_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 6, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T06:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01 06:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01T06:30").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2024-03-01").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn formats_with_utc_designator() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap();
        assert_eq!(format_iso8601(&dt), "2024-03-01T06:00:00Z");
    }

    #[test]
    fn empty_server_timestamp_is_none() {
        assert!(parse_server_timestamp("").is_none());
        assert!(parse_server_timestamp("2024-03-01T06:00:00Z").is_some());
    }
}
