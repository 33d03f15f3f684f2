use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::core::{Result, StoreError};

/// A single column value of a player record.
///
/// Enumerations carry their declaration ordinal so that they sort the way
/// they are declared rather than alphabetically.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Text(String),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Enum {
        kind: &'static str,
        ordinal: u8,
        name: &'static str,
    },
}

impl Value {
    pub fn compare(&self, other: &Value) -> Result<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Ok(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Ok(a.cmp(b)),

            (
                Value::Enum {
                    kind: a_kind,
                    ordinal: a,
                    ..
                },
                Value::Enum {
                    kind: b_kind,
                    ordinal: b,
                    ..
                },
            ) if a_kind == b_kind => Ok(a.cmp(b)),

            _ => Err(self.mismatch(other)),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::Text(_) => "TEXT",
            Self::Boolean(_) => "BOOLEAN",
            Self::Timestamp(_) => "TIMESTAMP",
            Self::Enum { .. } => "ENUM",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Enum { name, .. } => Some(name),
            _ => None,
        }
    }

    fn mismatch(&self, other: &Value) -> StoreError {
        StoreError::TypeMismatch(format!(
            "Cannot compare {} ({}) with {} ({})",
            self,
            self.type_name(),
            other,
            other.type_name()
        ))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            Self::Enum { name, .. } => write!(f, "{name}"),
        }
    }
}
