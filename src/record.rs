//! Field names and identifier handling shared by questions and corrections.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Number, Value};

pub const ID_FIELD: &str = "_id";
pub const SUB_CATEGORY_FIELD: &str = "sub_category";

/// Identifier joining a question to its correction.
///
/// `"7"` and `7` are different ids. `7` and `7.0` are the same id: numbers
/// are stored in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(Number),
}

impl RecordId {
    /// Reads an id from a JSON value; only strings and numbers qualify.
    pub fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::String(s) => Some(RecordId::Text(s.clone())),
            Value::Number(n) => Some(RecordId::Number(canonical_number(n))),
            _ => None,
        }
    }

    /// The `_id` of a record, if it has a usable one.
    pub fn of(obj: &Map<String, Value>) -> Option<Self> {
        obj.get(ID_FIELD).and_then(Self::from_value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordId::Text(s) => write!(f, "{s}"),
            RecordId::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Whole-number floats become integers so `1.0` and `1` compare equal.
pub fn canonical_number(n: &Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            Number::from(f as i64)
        }
        _ => n.clone(),
    }
}

/// Label equality as used for change detection; numbers compare by value.
pub fn labels_equal(old: Option<&Value>, new: &Value) -> bool {
    match (old, new) {
        (Some(Value::Number(a)), Value::Number(b)) => canonical_number(a) == canonical_number(b),
        (Some(a), b) => a == b,
        (None, _) => false,
    }
}

/// A field counts as present unless it is absent, null, false, 0 or "".
pub fn is_present(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(_) => true,
    }
}

/// Renders a label for trace lines: strings unquoted, missing as `<none>`.
pub fn label_text(v: Option<&Value>) -> String {
    match v {
        None => "<none>".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
