use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::DbfError;
use crate::format::{FieldDescriptor, FieldType};

/// A decoded field value. One variant per supported field type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Character(String),
    Numeric(i64),
    Float(f64),
    Date(NaiveDate),
    Logical(bool),
}

impl Value {
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Character(_) => FieldType::Character,
            Value::Numeric(_) => FieldType::Numeric,
            Value::Float(_) => FieldType::Float,
            Value::Date(_) => FieldType::Date,
            Value::Logical(_) => FieldType::Logical,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Character(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Numeric(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric values widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Numeric(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Logical(b) => Some(*b),
            _ => None,
        }
    }

    /// Parse user-supplied text as a value for `field`.
    ///
    /// Dates accept `YYYY-MM-DD` and `YYYYMMDD`; logicals accept
    /// `t/f`, `y/n`, `true/false`, `yes/no` and `1/0`.
    pub fn parse_as(field: &FieldDescriptor, text: &str) -> Result<Value, DbfError> {
        let trimmed = text.trim();
        let invalid = |what: &str| {
            DbfError::encode(&field.name, format!("'{text}' is not a valid {what}"))
        };
        match field.field_type {
            FieldType::Character => Ok(Value::Character(text.to_string())),
            FieldType::Numeric => trimmed
                .parse::<i64>()
                .map(Value::Numeric)
                .map_err(|_| invalid("integer")),
            FieldType::Float => trimmed
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| invalid("number")),
            FieldType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y%m%d"))
                .map(Value::Date)
                .map_err(|_| invalid("date")),
            FieldType::Logical => match trimmed.to_ascii_lowercase().as_str() {
                "t" | "y" | "true" | "yes" | "1" => Ok(Value::Logical(true)),
                "f" | "n" | "false" | "no" | "0" => Ok(Value::Logical(false)),
                _ => Err(invalid("logical")),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Character(s) => f.write_str(s),
            Value::Numeric(n) => write!(f, "{n}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Logical(b) => f.write_str(if *b { "T" } else { "F" }),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Character(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Character(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Numeric(n)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Logical(b)
    }
}
