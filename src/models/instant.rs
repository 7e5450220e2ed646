//! Parsing of user-supplied instants

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// Parse an instant from text.
///
/// Accepts RFC 3339 (`2024-05-01T09:30:00Z`), a date alone (`2024-05-01`,
/// read as midnight UTC) and a zone-less date-time (`2024-05-01T09:30:00`,
/// read in local time).
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| invalid(s))?;
        return Ok(Utc.from_utc_datetime(&midnight));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| invalid(s));
        }
    }

    Err(invalid(s))
}

fn invalid(s: &str) -> String {
    format!("Invalid date: {}", s)
}

/// Deserialize an optional due date that tolerates `null` and `""` as "no date".
pub(crate) fn deserialize_optional_instant<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_instant(s).map(Some).map_err(serde::de::Error::custom),
    }
}

/// Deserialize a patch field where presence matters: a missing key leaves the
/// outer `Option` as `None` (via `#[serde(default)]`), while `null` or `""`
/// become `Some(None)`.
pub(crate) fn deserialize_patch_instant<'de, D>(
    deserializer: D,
) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional_instant(deserializer).map(Some)
}
