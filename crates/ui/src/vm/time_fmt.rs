use chrono::{DateTime, Utc};
use review_core::time::parse_wire_datetime;

/// Calendar date, e.g. `Mar 5, 2024`.
#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y").to_string()
}

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y %H:%M").to_string()
}

/// Render a raw backend timestamp; missing or unparseable values read "Never".
#[must_use]
pub fn format_wire_timestamp(raw: Option<&str>) -> String {
    raw.and_then(parse_wire_datetime)
        .map_or_else(|| "Never".to_string(), format_datetime)
}
