use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::format::format_f64;

/// A raw field value looked up on a record by column key.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Empty,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(value) => write!(f, "{value}"),
            FieldValue::Number(value) => write!(f, "{}", format_f64(*value)),
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            FieldValue::Timestamp(value) => write!(f, "{}", value.to_rfc3339()),
            FieldValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Empty)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

/// Anything a table can list: a stable string id plus keyed field lookup.
pub trait Record {
    fn id(&self) -> &str;

    /// Returns `None` for keys the record does not know.
    fn field(&self, key: &str) -> Option<FieldValue>;
}
