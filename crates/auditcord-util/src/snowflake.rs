use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use thiserror::Error;

/// Discord epoch: 2015-01-01T00:00:00Z
const DISCORD_EPOCH: u64 = 1_420_070_400_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnowflakeError {
    #[error("invalid snowflake: {0}")]
    Invalid(String),
}

/// Extract the Unix timestamp (ms) from a snowflake.
/// Format: 42 bits timestamp | 5 bits worker | 5 bits process | 12 bits increment
pub fn timestamp_millis(id: i64) -> u64 {
    ((id as u64) >> 22) + DISCORD_EPOCH
}

/// Creation time of the object a snowflake identifies.
pub fn created_at(id: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(timestamp_millis(id) as i64)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Parse a snowflake from its wire form, which is usually a decimal string.
pub fn parse_str(raw: &str) -> Result<i64, SnowflakeError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| SnowflakeError::Invalid(raw.to_string()))
}

/// Read a snowflake out of a loosely-typed JSON value (string or integer).
pub fn from_value(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => parse_str(s).ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

/// Serde codec for snowflakes: writes strings, reads strings or integers.
pub mod string {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        deserializer.deserialize_any(SnowflakeVisitor)
    }

    pub(super) struct SnowflakeVisitor;

    impl<'de> Visitor<'de> for SnowflakeVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a snowflake as a string or integer")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::custom(format!("snowflake out of range: {v}")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            super::parse_str(v).map_err(E::custom)
        }
    }
}

/// Same as [`string`] for optional ids; `null` and a missing field both read as `None`.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.collect_str(id),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapped(#[serde(with = "super::string")] i64);

        Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(id)| id))
    }
}

/// Same as [`string`] for id lists.
pub mod vec {
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ids: &[i64], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(ids.len()))?;
        for id in ids {
            seq.serialize_element(&id.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<i64>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapped(#[serde(with = "super::string")] i64);

        Ok(Vec::<Wrapped>::deserialize(deserializer)?
            .into_iter()
            .map(|Wrapped(id)| id)
            .collect())
    }
}
