use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use folio_core::FieldMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_");
    serde_json::from_value(Value::String(normalized))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// An argument given inline, or as `@path` to read from a file.
pub fn inline_or_file(raw: &str) -> anyhow::Result<String> {
    match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("failed to read {path}")),
        None => Ok(raw.to_string()),
    }
}

/// A JSON object of field values.
pub fn parse_field_map(raw: &str) -> anyhow::Result<FieldMap> {
    let text = inline_or_file(raw)?;
    match serde_json::from_str(&text).context("--data is not valid JSON")? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("--data must be a JSON object, got {other}"),
    }
}

/// Any JSON value deserializable as `T`, inline or `@path`.
pub fn parse_json_arg<T: DeserializeOwned>(raw: &str, field: &str) -> anyhow::Result<T> {
    let text = inline_or_file(raw)?;
    serde_json::from_str(&text).with_context(|| format!("invalid {field}"))
}

/// An RFC 3339 timestamp, or a `YYYY-MM-DD` date taken as midnight UTC.
pub fn parse_timestamp(raw: &str, field: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| anyhow::anyhow!("invalid {field} '{raw}': expected RFC 3339 or YYYY-MM-DD"))
}
