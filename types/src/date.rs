//! Date parsing for values that arrive as text.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::ValueError;

/// Calendar date layout accepted alongside RFC 3339.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, ValueError> {
    let trimmed = input.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(stamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| ValueError::InvalidDate {
            input: input.to_string(),
        })
}
