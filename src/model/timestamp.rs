//! JSON form of nullable TIMESTAMP fields.
//!
//! Reads RFC 3339 with a zone (`2024-01-02T03:04:05Z`, `...+03:00`) or a bare
//! `2024-01-02T03:04:05`; zoned values are converted to UTC. Writes RFC 3339 in UTC with `Z`.
//! Storage stays zone-less: the column holds the UTC wall time.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};

pub fn format(t: &NaiveDateTime) -> String {
    t.and_utc().to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc).naive_utc())
        .or_else(|_| raw.parse::<NaiveDateTime>())
        .ok()
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.serialize_str(&format(t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format_args!("invalid timestamp: {}", raw))),
        }
    }
}
