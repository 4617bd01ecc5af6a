// src/row.rs

//! Result rows as streamed back by the query engine.
//!
//! A [`Row`] is consumed exactly once by a Row Converter and dropped right
//! after; nothing here is retained across rows.

use crate::errors::ConversionError;

/// Typed scalar value of one result column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int64(i64),
    Float64(f64),
    String(String),
    /// Nanoseconds since the Unix epoch.
    Time64Ns(i64),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int64(_) => "int64",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::Time64Ns(_) => "time64ns",
        }
    }
}

/// Ordered mapping from column name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. A repeated name shadows the earlier value on lookup.
    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.columns.push((column.into(), value));
    }

    pub fn with(mut self, column: impl Into<String>, value: Value) -> Self {
        self.push(column, value);
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .rev()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v)
    }

    pub fn require(&self, column: &str) -> Result<&Value, ConversionError> {
        self.get(column).ok_or_else(|| ConversionError::MissingColumn {
            column: column.to_string(),
        })
    }

    /// Numeric column as `f64`; both Int64 and Float64 are accepted.
    pub fn get_f64(&self, column: &str) -> Result<f64, ConversionError> {
        match self.require(column)? {
            Value::Int64(v) => Ok(*v as f64),
            Value::Float64(v) => Ok(*v),
            other => Err(unexpected(column, "int64 or float64", other)),
        }
    }

    pub fn get_i64(&self, column: &str) -> Result<i64, ConversionError> {
        match self.require(column)? {
            Value::Int64(v) => Ok(*v),
            other => Err(unexpected(column, "int64", other)),
        }
    }

    pub fn get_str(&self, column: &str) -> Result<&str, ConversionError> {
        match self.require(column)? {
            Value::String(v) => Ok(v.as_str()),
            other => Err(unexpected(column, "string", other)),
        }
    }

    /// Optional string column: absent is `None`, present-but-not-a-string is
    /// still an error.
    pub fn opt_str(&self, column: &str) -> Result<Option<&str>, ConversionError> {
        match self.get(column) {
            None => Ok(None),
            Some(Value::String(v)) => Ok(Some(v.as_str())),
            Some(other) => Err(unexpected(column, "string", other)),
        }
    }

    /// Timestamp column in nanoseconds since the epoch.
    pub fn get_time_ns(&self, column: &str) -> Result<u64, ConversionError> {
        let ns = match self.require(column)? {
            Value::Time64Ns(v) => *v,
            other => return Err(unexpected(column, "time64ns", other)),
        };
        u64::try_from(ns).map_err(|_| ConversionError::Unusable {
            column: column.to_string(),
            reason: format!("timestamp {ns} is before the Unix epoch"),
        })
    }
}

fn unexpected(column: &str, expected: &'static str, found: &Value) -> ConversionError {
    ConversionError::UnexpectedType {
        column: column.to_string(),
        expected,
        found: found.type_name(),
    }
}
