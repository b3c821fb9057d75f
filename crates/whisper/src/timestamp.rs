//! `createdAt` parsing.
//!
//! The backend may send either an RFC 3339 timestamp or a bare local
//! date-time without an offset. The latter is treated as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap();
        assert_eq!(parse("2024-03-09T18:30:00Z"), Some(expected));
        assert_eq!(parse("2024-03-09T19:30:00+01:00"), Some(expected));
        assert_eq!(parse("2024-03-09T18:30:00"), Some(expected));
        assert!(parse("2024-03-09T18:30:00.123456").is_some());
        assert_eq!(parse("yesterday"), None);
    }
}
