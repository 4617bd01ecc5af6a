// src/exec/rows.rs

//! JSON-lines row decoding for query CLIs that print one JSON object per
//! result record.

use chrono::DateTime;
use serde_json::{Map, Value as JsonValue};

use crate::errors::{CollectorError, Result};
use crate::row::{Row, Value};

/// Decode one stdout line.
///
/// - blank lines yield `None`;
/// - keys starting with `_` (e.g. `_tableName`) are metadata and dropped;
/// - integers become `Int64` (or `Float64` if they overflow `i64`);
/// - floats become `Float64`;
/// - RFC 3339 strings become `Time64Ns`, other strings stay `String`;
/// - booleans become `Int64` 0/1;
/// - `null` columns are omitted;
/// - nested arrays/objects are kept as their JSON text.
pub fn decode_line(line: &str) -> Result<Option<Row>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let object: Map<String, JsonValue> = serde_json::from_str(line).map_err(|e| {
        CollectorError::Streaming(format!("malformed result record: {e}"))
    })?;

    let mut row = Row::new();
    for (column, value) in object {
        if column.starts_with('_') {
            continue;
        }
        if let Some(value) = decode_value(value) {
            row.push(column, value);
        }
    }

    Ok(Some(row))
}

fn decode_value(value: JsonValue) -> Option<Value> {
    match value {
        JsonValue::Null => None,
        JsonValue::Bool(b) => Some(Value::Int64(i64::from(b))),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Some(Value::Int64(i)),
            None => n.as_f64().map(Value::Float64),
        },
        JsonValue::String(s) => Some(decode_string(s)),
        other => Some(Value::String(other.to_string())),
    }
}

fn decode_string(s: String) -> Value {
    match DateTime::parse_from_rfc3339(&s)
        .ok()
        .and_then(|ts| ts.timestamp_nanos_opt())
    {
        Some(ns) => Value::Time64Ns(ns),
        None => Value::String(s),
    }
}
