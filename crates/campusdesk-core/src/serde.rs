//! Lenient deserializers for query parameters.
//!
//! Browsers submit untouched form fields as empty strings; these helpers
//! treat `""` as `None` instead of failing the whole request.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(s.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn deserialize_optional_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Query {
        #[serde(default, deserialize_with = "deserialize_optional_i32")]
        year: Option<i32>,
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        id: Option<Uuid>,
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        label: Option<String>,
    }

    #[test]
    fn test_empty_strings_become_none() {
        let q: Query = serde_json::from_str(r#"{"year":"","id":"","label":"  "}"#).unwrap();
        assert_eq!(q.year, None);
        assert_eq!(q.id, None);
        assert_eq!(q.label, None);
    }

    #[test]
    fn test_values_are_parsed() {
        let q: Query = serde_json::from_str(
            r#"{"year":"2","id":"12345678-1234-1234-1234-123456789abc","label":"2025-2026"}"#,
        )
        .unwrap();
        assert_eq!(q.year, Some(2));
        assert_eq!(
            q.id,
            Some(Uuid::from_u128(0x12345678_1234_1234_1234_123456789abc))
        );
        assert_eq!(q.label.as_deref(), Some("2025-2026"));
    }

    #[test]
    fn test_invalid_number_is_error() {
        let result: Result<Query, _> = serde_json::from_str(r#"{"year":"two"}"#);
        assert!(result.is_err());
    }
}
