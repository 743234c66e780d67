use serde::de::{self, Deserializer};
use serde::{Deserialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Durations in configuration files are given in milliseconds.
pub fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let ms: u64 = Deserialize::deserialize(deserializer)?;
    Ok(Duration::from_millis(ms))
}

pub fn serialize_duration<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber<T> {
    Number(T),
    String(String),
}

/// The cat APIs send every cell as a string, even counters. This accepts
/// `"12"`, `12`, `""` and `null`, the last two meaning no value.
pub fn deserialize_opt_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: fmt::Display,
{
    match Option::<StringOrNumber<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrNumber::Number(n)) => Ok(Some(n)),
        Some(StringOrNumber::String(s)) if s.is_empty() => Ok(None),
        Some(StringOrNumber::String(s)) => s.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Same as [`deserialize_opt_number`] for flags, which come as `"true"`/`"false"`.
pub fn deserialize_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_opt_number(deserializer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "deserialize_opt_number")]
        count: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_opt_bool")]
        flag: Option<bool>,
    }

    #[test]
    fn should_read_numbers_given_as_strings() {
        let row: Row = serde_json::from_str(r#"{"count":"12","flag":"true"}"#).unwrap();
        assert_eq!(row.count, Some(12));
        assert_eq!(row.flag, Some(true));
    }

    #[test]
    fn should_read_plain_numbers_and_blanks() {
        let row: Row = serde_json::from_str(r#"{"count":7,"flag":""}"#).unwrap();
        assert_eq!(row.count, Some(7));
        assert_eq!(row.flag, None);

        let row: Row = serde_json::from_str(r#"{"count":null}"#).unwrap();
        assert_eq!(row.count, None);
    }

    #[test]
    fn should_reject_garbage() {
        assert!(serde_json::from_str::<Row>(r#"{"count":"twelve"}"#).is_err());
    }
}
