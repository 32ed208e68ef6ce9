//! Sorting: direction, the single active sort key, and comparators.
//!
//! Only one sort key is active at a time. Missing values, NaN, and values
//! whose shape does not match the field's declared kind sort after every
//! well-formed value, in both directions.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::accessor::{AccessorRegistry, FieldKind};
use crate::error::{QueryError, Result};
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Direction {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Direction::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Direction::Desc)
    }

    /// The opposite direction.
    pub fn reversed(self) -> Direction {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    /// Applies this direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The active sort key and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    #[serde(default)]
    pub direction: Direction,
}

impl SortSpec {
    /// Creates a sort spec with the given direction.
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        SortSpec {
            field: field.into(),
            direction,
        }
    }

    /// Creates an ascending sort spec.
    pub fn asc(field: impl Into<String>) -> Self {
        SortSpec::new(field, Direction::Asc)
    }

    /// Creates a descending sort spec.
    pub fn desc(field: impl Into<String>) -> Self {
        SortSpec::new(field, Direction::Desc)
    }

    /// The sort that results from clicking the column `field`.
    ///
    /// The same key flips direction; a different key replaces this one and
    /// starts ascending.
    ///
    /// ```
    /// use tanaw_query::{Direction, SortSpec};
    ///
    /// let sort = SortSpec::asc("name").toggle("name");
    /// assert_eq!(sort.direction, Direction::Desc);
    ///
    /// let sort = sort.toggle("capacity");
    /// assert_eq!(sort, SortSpec::asc("capacity"));
    /// ```
    pub fn toggle(&self, field: &str) -> SortSpec {
        if self.field == field {
            SortSpec::new(field, self.direction.reversed())
        } else {
            SortSpec::asc(field)
        }
    }
}

impl std::fmt::Display for SortSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.direction)
    }
}

/// Compares two values of the same type in ascending order.
///
/// Returns `None` if the types don't match or comparison is not possible (NaN).
/// Strings compare lexicographically, booleans `false < true`, tag lists
/// element by element.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Tags(a), Value::Tags(b)) => Some(a.cmp(b)),
        (Value::None, Value::None) => Some(Ordering::Equal),
        _ => None,
    }
}

/// A record's resolved sort key.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SortKey<'a> {
    /// A well-formed value of the field's kind.
    Present(Value<'a>),
    /// Missing, NaN, or the wrong shape: sorts last.
    Last,
}

impl<'a> SortKey<'a> {
    pub(crate) fn new(value: Value<'a>, kind: FieldKind) -> Self {
        let nan = matches!(&value, Value::Number(n) if n.is_nan());
        if !nan && kind.accepts(&value) {
            SortKey::Present(value)
        } else {
            SortKey::Last
        }
    }

    pub(crate) fn compare(&self, other: &SortKey<'_>, direction: Direction) -> Ordering {
        match (self, other) {
            (SortKey::Present(a), SortKey::Present(b)) => {
                direction.apply(compare_values(a, b).unwrap_or(Ordering::Equal))
            }
            (SortKey::Present(_), SortKey::Last) => Ordering::Less,
            (SortKey::Last, SortKey::Present(_)) => Ordering::Greater,
            (SortKey::Last, SortKey::Last) => Ordering::Equal,
        }
    }
}

/// Builds a total-order comparator for `spec`, usable with any stable sort.
///
/// Returns [`QueryError::UnknownSortField`] if no accessor is registered for
/// the sort field. Equal keys compare `Equal`, so a stable sort keeps their
/// prior relative order.
///
/// The comparator resolves both values on every call. [`sort_records`]
/// resolves each record once instead and is what the query engine uses.
pub fn build_comparator<'r, T>(
    spec: &SortSpec,
    accessors: &'r AccessorRegistry<T>,
) -> Result<impl Fn(&T, &T) -> Ordering + 'r> {
    let accessor = accessors
        .get(&spec.field)
        .ok_or_else(|| QueryError::UnknownSortField {
            field: spec.field.clone(),
        })?;
    let kind = accessor.kind();
    let direction = spec.direction;

    Ok(move |a: &T, b: &T| {
        SortKey::new(accessor.get(a), kind).compare(&SortKey::new(accessor.get(b), kind), direction)
    })
}

/// Sorts `items` by `spec`, resolving each record's key exactly once.
///
/// The sort is stable. The input vector is consumed; the caller's underlying
/// collection is never touched.
pub fn sort_records<'a, T>(
    items: Vec<&'a T>,
    spec: &SortSpec,
    accessors: &AccessorRegistry<T>,
) -> Result<Vec<&'a T>> {
    let accessor = accessors
        .get(&spec.field)
        .ok_or_else(|| QueryError::UnknownSortField {
            field: spec.field.clone(),
        })?;
    let kind = accessor.kind();

    let mut keyed: Vec<(SortKey<'a>, &'a T)> = items
        .into_iter()
        .map(|item| (SortKey::new(accessor.get(item), kind), item))
        .collect();
    keyed.sort_by(|a, b| a.0.compare(&b.0, spec.direction));

    Ok(keyed.into_iter().map(|(_, item)| item).collect())
}
