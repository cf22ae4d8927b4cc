//! Lenient trip date parsing.
//!
//! Browsers send either a full RFC 3339 timestamp or a bare `YYYY-MM-DD` from a
//! date picker. Bare dates and timestamps without an offset are taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, de::Error};

const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(moment) = DateTime::parse_from_rfc3339(raw) {
        return Some(moment.with_timezone(&Utc));
    }

    for format in LOCAL_FORMATS {
        if let Ok(moment) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(moment.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|moment| moment.and_utc())
}

pub fn flexible<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date `{raw}`")))
}

pub fn flexible_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date `{raw}`"))))
        .transpose()
}
