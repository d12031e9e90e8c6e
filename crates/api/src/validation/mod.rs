//! Schema validation over the normalized parameter map: declarative
//! per-field rules plus a list of cross-field refinements. Pure and total —
//! every input yields either a typed value or a non-empty violation list,
//! and all violations are collected in field order rather than failing fast.

pub mod task;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use task::{validate_create_task, CreateTaskRequest};

/// One rule failure, attached to the offending field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Required string field. Absent or null counts as missing.
pub(crate) fn required_string(
    params: &Map<String, Value>,
    field: &str,
    missing_message: &str,
    out: &mut Vec<Violation>,
) -> Option<String> {
    match params.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => {
            out.push(Violation::new(field, missing_message));
            None
        }
        Some(_) => {
            out.push(Violation::new(field, format!("{field} must be a string")));
            None
        }
    }
}

/// Optional string field. Outer `None` means a type violation was recorded;
/// `Some(None)` means absent-or-null.
pub(crate) fn optional_string(
    params: &Map<String, Value>,
    field: &str,
    out: &mut Vec<Violation>,
) -> Option<Option<String>> {
    match params.get(field) {
        Some(Value::String(s)) => Some(Some(s.clone())),
        Some(Value::Null) | None => Some(None),
        Some(_) => {
            out.push(Violation::new(field, format!("{field} must be a string")));
            None
        }
    }
}

/// Optional RFC 3339 date-time field.
pub(crate) fn optional_datetime(
    params: &Map<String, Value>,
    field: &str,
    invalid_message: &str,
    out: &mut Vec<Violation>,
) -> Option<Option<DateTime<Utc>>> {
    match params.get(field) {
        Some(Value::String(s)) => match DateTime::parse_from_rfc3339(s) {
            Ok(parsed) => Some(Some(parsed.with_timezone(&Utc))),
            Err(_) => {
                out.push(Violation::new(field, invalid_message));
                None
            }
        },
        Some(Value::Null) | None => Some(None),
        Some(_) => {
            out.push(Violation::new(field, invalid_message));
            None
        }
    }
}

/// Optional integer-enumerated field with a default for absent-or-null.
pub(crate) fn int_enum_with_default<T>(
    params: &Map<String, Value>,
    field: &str,
    default: T,
    out: &mut Vec<Violation>,
) -> Option<T>
where
    T: TryFrom<i64>,
{
    match params.get(field) {
        Some(Value::Number(n)) => match n.as_i64().and_then(|raw| T::try_from(raw).ok()) {
            Some(value) => Some(value),
            None => {
                out.push(Violation::new(field, format!("{field} is not a valid value")));
                None
            }
        },
        Some(Value::Null) | None => Some(default),
        Some(_) => {
            out.push(Violation::new(field, format!("{field} is not a valid value")));
            None
        }
    }
}

/// Nullable foreign-key field: absent, null, or an integer.
pub(crate) fn nullable_fk(
    params: &Map<String, Value>,
    field: &str,
    out: &mut Vec<Violation>,
) -> Option<Option<i64>> {
    match params.get(field) {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(id) => Some(Some(id)),
            None => {
                out.push(Violation::new(field, format!("{field} must be an integer or null")));
                None
            }
        },
        Some(Value::Null) | None => Some(None),
        Some(_) => {
            out.push(Violation::new(field, format!("{field} must be an integer or null")));
            None
        }
    }
}
