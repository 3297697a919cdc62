use serde::{Deserialize, Deserializer};

/// Each company is given a CIK code, intended to be a 10-character string,
/// as below:
///
/// ```text
/// 0000320193 - AAPL - Apple Inc.
/// ```
///
/// but the feeds frequently carry the shortened numeric form:
///
/// ```text
/// 320193 - AAPL - Apple Inc.
/// ```
///
/// `de_cik` accepts both, returning the raw (unpadded) string form.
pub(crate) fn de_cik<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: serde_json::Value = Deserialize::deserialize(deserializer)?;
    cik_from_value(value).map_err(serde::de::Error::custom)
}

/// `de_cik` for documents where the CIK field may be null.
pub(crate) fn de_cik_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: serde_json::Value = Deserialize::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(None),
        other => cik_from_value(other)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn cik_from_value(value: serde_json::Value) -> Result<String, &'static str> {
    match value {
        serde_json::Value::Number(num) => match num.as_u64() {
            Some(num) => Ok(num.to_string()),
            None => Err("CIK number is not an unsigned integer"),
        },
        serde_json::Value::String(s) => Ok(s),
        _ => Err("invalid type for CIK"),
    }
}

/// Left-pad a CIK with zeroes to the 10-character form used by the
/// submissions endpoints.
pub(crate) fn zfill(cik: &str) -> String {
    format!("{cik:0>10}")
}
