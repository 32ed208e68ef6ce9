//! Schemaless records backed by `serde_json`.
//!
//! JSON objects act as records directly. Field names may be dotted
//! (`location.barangay`) to reach into nested objects.

use std::borrow::Cow;

use serde_json::{Map, Value as Json};

use crate::traits::Record;
use crate::value::{Number, Value};

impl Record for Map<String, Json> {
    fn field_value(&self, field: &str) -> Value<'_> {
        if let Some(found) = self.get(field) {
            return json_to_value(found);
        }
        let mut parts = field.split('.');
        let Some(first) = parts.next() else {
            return Value::None;
        };
        let mut current = match self.get(first) {
            Some(v) => v,
            None => return Value::None,
        };
        for part in parts {
            current = match current.get(part) {
                Some(v) => v,
                None => return Value::None,
            };
        }
        json_to_value(current)
    }
}

impl Record for Json {
    fn field_value(&self, field: &str) -> Value<'_> {
        match self {
            Json::Object(map) => map.field_value(field),
            _ => Value::None,
        }
    }
}

/// Converts a JSON value into a [`Value`].
///
/// Arrays become tag lists of their string elements; objects and nulls are
/// [`Value::None`].
pub fn json_to_value(json: &Json) -> Value<'_> {
    match json {
        Json::String(s) => Value::String(Cow::Borrowed(s.as_str())),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(Number::I64(i))
            } else if let Some(u) = n.as_u64() {
                Value::Number(Number::U64(u))
            } else {
                n.as_f64()
                    .map(|f| Value::Number(Number::F64(f)))
                    .unwrap_or(Value::None)
            }
        }
        Json::Bool(b) => Value::Bool(*b),
        Json::Array(items) => Value::Tags(
            items
                .iter()
                .filter_map(|item| item.as_str().map(Cow::Borrowed))
                .collect(),
        ),
        Json::Null | Json::Object(_) => Value::None,
    }
}
