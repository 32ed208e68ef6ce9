//! Filter clauses.
//!
//! A [`FilterClause`] is a single declarative predicate over one record.
//! Clauses carrying their "no constraint" sentinel (`"all"` or an empty
//! string, depending on the clause) are no-ops and always pass.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::accessor::AccessorRegistry;
use crate::value::{Number, Timestamp, Value};

/// Sentinel meaning "no constraint" for dropdown-style filters.
pub const ALL: &str = "all";

/// Owned comparison value stored in a clause.
///
/// Unlike [`Value`], which borrows from the record, `Scalar` owns its data so
/// it can live in a serialized query state. Dates are written as ISO-8601
/// text (or epoch milliseconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// Text value, also used for dates.
    Text(String),
}

impl Scalar {
    /// Returns `true` for the `"all"` sentinel and the empty string.
    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.is_empty() || s == ALL)
    }

    /// Returns `true` for the empty string (an unset range bound).
    pub fn is_blank(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.is_empty())
    }

    /// Parses user input: booleans, then numbers, falling back to text.
    pub fn parse(input: &str) -> Scalar {
        match input {
            "true" => Scalar::Bool(true),
            "false" => Scalar::Bool(false),
            other => match Number::parse(other) {
                Some(n) if !n.is_nan() => Scalar::Number(n),
                _ => Scalar::Text(other.to_string()),
            },
        }
    }

    fn equals(&self, value: &Value<'_>) -> bool {
        match (self, value) {
            (Scalar::Text(expected), Value::String(actual)) => actual.as_ref() == expected.as_str(),
            (Scalar::Text(expected), Value::Number(actual)) => Number::parse(expected)
                .and_then(|n| actual.compare(n))
                .is_some_and(Ordering::is_eq),
            (Scalar::Text(expected), Value::Timestamp(actual)) => {
                Timestamp::parse(expected) == Some(*actual)
            }
            (Scalar::Text(expected), Value::Bool(actual)) => match expected.as_str() {
                "true" => *actual,
                "false" => !*actual,
                _ => false,
            },
            (Scalar::Number(expected), Value::Number(actual)) => {
                actual.compare(*expected).is_some_and(Ordering::is_eq)
            }
            (Scalar::Number(expected), Value::Timestamp(actual)) => {
                !expected.is_nan() && actual.as_millis() == expected.to_f64() as i64
            }
            (Scalar::Bool(expected), Value::Bool(actual)) => expected == actual,
            _ => false,
        }
    }

    /// Orders `value` relative to this bound, when the two are comparable.
    fn compare_bound(&self, value: &Value<'_>) -> Option<Ordering> {
        match (value, self) {
            (Value::Number(v), Scalar::Number(b)) => v.compare(*b),
            (Value::Number(v), Scalar::Text(b)) => Number::parse(b).and_then(|b| v.compare(b)),
            (Value::Timestamp(v), Scalar::Text(b)) => Timestamp::parse(b).map(|b| v.cmp(&b)),
            (Value::Timestamp(v), Scalar::Number(b)) if !b.is_nan() => {
                Some(v.as_millis().cmp(&(b.to_f64() as i64)))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<Number> for Scalar {
    fn from(n: Number) -> Self {
        Scalar::Number(n)
    }
}

impl From<Timestamp> for Scalar {
    fn from(t: Timestamp) -> Self {
        Scalar::Number(Number::I64(t.as_millis()))
    }
}

macro_rules! scalar_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(n: $t) -> Self {
                    Scalar::Number(Number::from(n))
                }
            }
        )*
    };
}

scalar_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// A single filter predicate.
///
/// # Example
///
/// ```
/// use tanaw_query::FilterClause;
///
/// let status = FilterClause::equals("status", "all");
/// assert!(status.is_noop());
///
/// let search = FilterClause::any_of(["name", "barangay"], "san");
/// assert!(!search.is_noop());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FilterClause {
    /// Exact match. `"all"` or `""` means no constraint.
    Equals { field: String, value: Scalar },
    /// Case-insensitive substring match. `""` means no constraint.
    Contains { field: String, needle: String },
    /// Inclusive numeric or date bounds, either end optional.
    Range {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<Scalar>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<Scalar>,
    },
    /// Membership in an array-of-string field. `"all"` or `""` means no constraint.
    IncludesTag { field: String, tag: String },
    /// Case-insensitive substring match in at least one of several fields.
    AnyOf { fields: Vec<String>, needle: String },
}

impl FilterClause {
    /// Creates an exact-match clause.
    pub fn equals(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        FilterClause::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a case-insensitive substring clause.
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        FilterClause::Contains {
            field: field.into(),
            needle: needle.into(),
        }
    }

    /// Creates a range clause.
    pub fn range(field: impl Into<String>, min: Option<Scalar>, max: Option<Scalar>) -> Self {
        FilterClause::Range {
            field: field.into(),
            min,
            max,
        }
    }

    /// Creates a tag-membership clause.
    pub fn includes_tag(field: impl Into<String>, tag: impl Into<String>) -> Self {
        FilterClause::IncludesTag {
            field: field.into(),
            tag: tag.into(),
        }
    }

    /// Creates a multi-field free-text clause.
    pub fn any_of<I, S>(fields: I, needle: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterClause::AnyOf {
            fields: fields.into_iter().map(Into::into).collect(),
            needle: needle.into(),
        }
    }

    /// The fields this clause reads.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            FilterClause::Equals { field, .. }
            | FilterClause::Contains { field, .. }
            | FilterClause::Range { field, .. }
            | FilterClause::IncludesTag { field, .. } => vec![field.as_str()],
            FilterClause::AnyOf { fields, .. } => fields.iter().map(String::as_str).collect(),
        }
    }

    /// Returns `true` if the clause carries its "no constraint" value.
    pub fn is_noop(&self) -> bool {
        match self {
            FilterClause::Equals { value, .. } => value.is_unconstrained(),
            FilterClause::Contains { needle, .. } | FilterClause::AnyOf { needle, .. } => {
                needle.is_empty()
            }
            FilterClause::Range { min, max, .. } => {
                min.as_ref().map_or(true, Scalar::is_blank)
                    && max.as_ref().map_or(true, Scalar::is_blank)
            }
            FilterClause::IncludesTag { tag, .. } => tag.is_empty() || tag == ALL,
        }
    }

    /// Evaluates this clause against a record.
    ///
    /// No-op clauses pass. Missing fields and values of the wrong shape fail.
    pub fn matches<T>(&self, record: &T, accessors: &AccessorRegistry<T>) -> bool {
        if self.is_noop() {
            return true;
        }
        match self {
            FilterClause::Equals { field, value } => value.equals(&accessors.resolve(record, field)),
            FilterClause::Contains { field, needle } => {
                contains_folded(&accessors.resolve_raw(record, field), &needle.to_lowercase())
            }
            FilterClause::Range { field, min, max } => {
                within(&accessors.resolve(record, field), min.as_ref(), max.as_ref())
            }
            FilterClause::IncludesTag { field, tag } => match accessors.resolve(record, field) {
                Value::Tags(tags) => tags.iter().any(|t| t.as_ref() == tag.as_str()),
                _ => false,
            },
            FilterClause::AnyOf { fields, needle } => {
                let needle = needle.to_lowercase();
                fields
                    .iter()
                    .any(|field| contains_folded(&accessors.resolve_raw(record, field), &needle))
            }
        }
    }
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterClause::Equals { field, value } => write!(f, "{} = {}", field, value),
            FilterClause::Contains { field, needle } => write!(f, "{} contains {:?}", field, needle),
            FilterClause::Range { field, min, max } => {
                let min = min.as_ref().map(ToString::to_string).unwrap_or_default();
                let max = max.as_ref().map(ToString::to_string).unwrap_or_default();
                write!(f, "{} in [{}, {}]", field, min, max)
            }
            FilterClause::IncludesTag { field, tag } => write!(f, "{} has {:?}", field, tag),
            FilterClause::AnyOf { fields, needle } => {
                write!(f, "any of {} contains {:?}", fields.join("|"), needle)
            }
        }
    }
}

/// Case-insensitive substring test; `needle` must already be lowercase.
fn contains_folded(value: &Value<'_>, needle: &str) -> bool {
    match value {
        Value::Tags(tags) => tags.iter().any(|t| t.to_lowercase().contains(needle)),
        other => other
            .to_text()
            .is_some_and(|text| text.to_lowercase().contains(needle)),
    }
}

fn within(value: &Value<'_>, min: Option<&Scalar>, max: Option<&Scalar>) -> bool {
    if let Some(bound) = min.filter(|b| !b.is_blank()) {
        match bound.compare_bound(value) {
            Some(Ordering::Less) | None => return false,
            _ => {}
        }
    }
    if let Some(bound) = max.filter(|b| !b.is_blank()) {
        match bound.compare_bound(value) {
            Some(Ordering::Greater) | None => return false,
            _ => {}
        }
    }
    true
}
