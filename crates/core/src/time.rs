use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 with an offset as well as naive ISO-8601 timestamps
/// (with or without fractional seconds), which are taken as UTC.
#[must_use]
pub fn parse_wire_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Parse a `YYYY-MM-DD` date from a form input; blank input means "unset".
#[must_use]
pub fn parse_date_input(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// `deserialize_with` helper for required backend timestamps.
///
/// # Errors
///
/// Returns a deserializer error if the value is not a recognizable timestamp.
pub fn deserialize_wire_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_wire_datetime(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// `deserialize_with` helper for optional backend timestamps.
///
/// Missing, null, blank and unparseable values all become `None`.
///
/// # Errors
///
/// Returns a deserializer error only if the value is not a string or null.
pub fn deserialize_optional_wire_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_wire_datetime))
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_offset_and_naive_timestamps() {
        let with_offset = parse_wire_datetime("2024-05-01T10:00:00+08:00").unwrap();
        assert_eq!(with_offset.hour(), 2);

        let naive = parse_wire_datetime("2024-05-01T10:00:00.123456").unwrap();
        assert_eq!(naive.hour(), 10);
        assert_eq!(naive.day(), 1);

        let spaced = parse_wire_datetime("2024-05-01 10:00:00").unwrap();
        assert_eq!(spaced, naive.with_nanosecond(0).unwrap());
    }

    #[test]
    fn rejects_blank_and_garbage() {
        assert!(parse_wire_datetime("").is_none());
        assert!(parse_wire_datetime("yesterday").is_none());
        assert!(parse_date_input("").is_none());
        assert_eq!(
            parse_date_input(" 2024-02-29 "),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }
}
