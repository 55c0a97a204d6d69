//! Serde helpers for lenient feed decoding.
//!
//! The events feed is produced by a separate job and occasionally carries
//! `null` or `""` where a value is optional. These helpers fold those into
//! the field's default so one sparse record never fails the whole batch.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Deserialize `null` as `T::default()`.
pub fn null_as_default<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Deserialize<'de> + Default,
    D: Deserializer<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize `null`, `""` and whitespace-only strings as `None`.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Deserialize any value, keeping it only if it has the expected shape.
pub fn ok_or_none<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "blank_as_none")]
        url: Option<String>,
    }

    #[test]
    fn test_null_and_blank_fold_to_defaults() {
        let sample: Sample = serde_json::from_str(r#"{"tags": null, "url": "  "}"#).unwrap();
        assert!(sample.tags.is_empty());
        assert_eq!(sample.url, None);
    }

    #[test]
    fn test_present_values_are_kept() {
        let sample: Sample =
            serde_json::from_str(r#"{"tags": ["cost:free"], "url": "https://example.org"}"#)
                .unwrap();
        assert_eq!(sample.tags, vec!["cost:free".to_string()]);
        assert_eq!(sample.url.as_deref(), Some("https://example.org"));
    }
}
