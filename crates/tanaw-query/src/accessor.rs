//! Field accessors and the registry that maps field names to them.
//!
//! Every field a query touches is read through an [`AccessorRegistry`]. Raw
//! accessors read a stored field; computed accessors derive a value from
//! several fields (an occupancy rate from `occupied` and `capacity`, say).
//! Each accessor declares a [`FieldKind`], which decides how stored values
//! are coerced before comparison.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::traits::Record;
use crate::value::{Number, Timestamp, Value};

type AccessFn<T> = dyn for<'a> Fn(&'a T) -> Value<'a> + Send + Sync;

/// The declared kind of a registered field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Integer or floating point number.
    Number,
    /// Date or date-time.
    Date,
    /// Boolean flag.
    Bool,
    /// Array of strings.
    Tags,
}

impl FieldKind {
    /// Coerces a raw value towards this kind.
    ///
    /// - `Date`: ISO-8601 strings are parsed, numbers are read as epoch millis.
    /// - `Number`: numeric strings are parsed.
    ///
    /// Values that cannot be coerced are returned unchanged.
    pub fn coerce(self, value: Value<'_>) -> Value<'_> {
        match (self, value) {
            (FieldKind::Date, Value::String(s)) => match Timestamp::parse(&s) {
                Some(ts) => Value::Timestamp(ts),
                None => Value::String(s),
            },
            (FieldKind::Date, Value::Number(n)) if !n.is_nan() => {
                Value::Timestamp(Timestamp(n.to_f64() as i64))
            }
            (FieldKind::Number, Value::String(s)) => match Number::parse(&s) {
                Some(n) => Value::Number(n),
                None => Value::String(s),
            },
            (_, other) => other,
        }
    }

    /// Returns `true` if `value` has the shape this kind expects.
    pub fn accepts(self, value: &Value<'_>) -> bool {
        matches!(
            (self, value),
            (FieldKind::Text, Value::String(_))
                | (FieldKind::Number, Value::Number(_))
                | (FieldKind::Date, Value::Timestamp(_))
                | (FieldKind::Bool, Value::Bool(_))
                | (FieldKind::Tags, Value::Tags(_))
        )
    }

    /// Returns the display name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Bool => "bool",
            FieldKind::Tags => "tags",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single registered accessor.
pub struct Accessor<T> {
    kind: FieldKind,
    computed: bool,
    get: Box<AccessFn<T>>,
}

impl<T> Accessor<T> {
    /// The declared kind of the field.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns `true` for computed (derived) fields.
    pub fn is_computed(&self) -> bool {
        self.computed
    }

    /// Reads the field from `record`, coerced to the declared kind.
    pub fn get<'a>(&self, record: &'a T) -> Value<'a> {
        self.kind.coerce((self.get)(record))
    }

    /// Reads the field from `record` as stored, without coercion.
    pub fn get_raw<'a>(&self, record: &'a T) -> Value<'a> {
        (self.get)(record)
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("kind", &self.kind)
            .field("computed", &self.computed)
            .finish_non_exhaustive()
    }
}

/// Mapping from field name to the accessor that reads it.
///
/// # Example
///
/// ```
/// use tanaw_query::{AccessorRegistry, FieldKind, Number, Value};
///
/// struct Center {
///     occupied: u32,
///     capacity: u32,
/// }
///
/// let accessors = AccessorRegistry::<Center>::new()
///     .register("capacity", FieldKind::Number, |c| Value::Number(c.capacity.into()))
///     .computed("occupancy_rate", FieldKind::Number, |c| {
///         if c.capacity == 0 {
///             return Value::None;
///         }
///         Value::Number(Number::F64(c.occupied as f64 / c.capacity as f64 * 100.0))
///     });
///
/// let center = Center { occupied: 45, capacity: 60 };
/// assert_eq!(
///     accessors.resolve(&center, "occupancy_rate"),
///     Value::Number(Number::F64(75.0))
/// );
/// assert!(accessors.resolve(&center, "unknown").is_none());
/// ```
pub struct AccessorRegistry<T> {
    accessors: HashMap<String, Accessor<T>>,
}

impl<T> Default for AccessorRegistry<T> {
    fn default() -> Self {
        AccessorRegistry {
            accessors: HashMap::new(),
        }
    }
}

impl<T> AccessorRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        AccessorRegistry::default()
    }

    /// Registers a raw accessor for a stored field.
    ///
    /// Registering a name twice replaces the earlier accessor.
    pub fn register<F>(self, field: impl Into<String>, kind: FieldKind, get: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        self.insert(field.into(), kind, false, Box::new(get))
    }

    /// Registers a computed accessor that derives a value from the record.
    pub fn computed<F>(self, field: impl Into<String>, kind: FieldKind, get: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        self.insert(field.into(), kind, true, Box::new(get))
    }

    fn insert(mut self, field: String, kind: FieldKind, computed: bool, get: Box<AccessFn<T>>) -> Self {
        self.accessors.insert(field, Accessor {
            kind,
            computed,
            get,
        });
        self
    }

    /// Returns the accessor registered for `field`.
    pub fn get(&self, field: &str) -> Option<&Accessor<T>> {
        self.accessors.get(field)
    }

    /// Returns `true` if an accessor is registered for `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.accessors.contains_key(field)
    }

    /// Returns the declared kind of `field`.
    pub fn kind(&self, field: &str) -> Option<FieldKind> {
        self.accessors.get(field).map(Accessor::kind)
    }

    /// Registered field names, sorted.
    pub fn fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.accessors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered accessors.
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    /// Reads `field` from `record`.
    ///
    /// Unregistered fields read as [`Value::None`], the same as a field the
    /// record does not carry.
    pub fn resolve<'a>(&self, record: &'a T, field: &str) -> Value<'a> {
        match self.accessors.get(field) {
            Some(accessor) => accessor.get(record),
            None => Value::None,
        }
    }

    /// Reads `field` from `record` as stored, skipping kind coercion.
    ///
    /// Substring search reads through this so a date matches the text the
    /// record holds, not a re-rendered instant.
    pub fn resolve_raw<'a>(&self, record: &'a T, field: &str) -> Value<'a> {
        match self.accessors.get(field) {
            Some(accessor) => accessor.get_raw(record),
            None => Value::None,
        }
    }
}

impl<T: Record + 'static> AccessorRegistry<T> {
    /// Builds a registry holding a raw accessor for every field the record
    /// type declares through [`Record::field_kinds`].
    pub fn from_record() -> Self {
        T::field_kinds()
            .iter()
            .fold(AccessorRegistry::new(), |registry, (field, kind)| {
                registry.raw(*field, *kind)
            })
    }

    /// Registers a raw accessor that reads `field` through [`Record::field_value`].
    ///
    /// This is how schemaless records (JSON objects) declare their fields.
    pub fn raw(self, field: impl Into<String>, kind: FieldKind) -> Self {
        let field = field.into();
        let name = field.clone();
        self.register(field, kind, move |record| record.field_value(&name))
    }
}

impl<T> fmt::Debug for AccessorRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<(&String, &Accessor<T>)> = self.accessors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        f.debug_map().entries(fields).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    struct Center {
        name: String,
        opened: String,
        capacity: u32,
        occupied: u32,
    }

    impl Record for Center {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::String(Cow::Borrowed(&self.name)),
                "opened" => Value::String(Cow::Borrowed(&self.opened)),
                "capacity" => Value::Number(Number::from(self.capacity)),
                "occupied" => Value::Number(Number::from(self.occupied)),
                _ => Value::None,
            }
        }

        fn field_kinds() -> &'static [(&'static str, FieldKind)] {
            &[
                ("name", FieldKind::Text),
                ("opened", FieldKind::Date),
                ("capacity", FieldKind::Number),
                ("occupied", FieldKind::Number),
            ]
        }
    }

    fn center() -> Center {
        Center {
            name: "Central Hall".to_string(),
            opened: "2024-10-22".to_string(),
            capacity: 200,
            occupied: 50,
        }
    }

    #[test]
    fn from_record_registers_declared_fields() {
        let registry = AccessorRegistry::<Center>::from_record();
        assert_eq!(registry.fields(), vec!["capacity", "name", "occupied", "opened"]);
        assert_eq!(registry.kind("opened"), Some(FieldKind::Date));
        assert!(!registry.get("name").unwrap().is_computed());
    }

    #[test]
    fn date_fields_are_parsed_on_resolve() {
        let registry = AccessorRegistry::<Center>::from_record();
        assert_eq!(
            registry.resolve(&center(), "opened"),
            Value::Timestamp(Timestamp::parse("2024-10-22").unwrap())
        );
    }

    #[test]
    fn resolve_raw_skips_coercion() {
        let registry = AccessorRegistry::<Center>::from_record();
        assert_eq!(registry.resolve_raw(&center(), "opened"), Value::from("2024-10-22"));
        assert!(registry.resolve_raw(&center(), "unknown").is_none());
    }

    #[test]
    fn computed_fields_sit_beside_raw_fields() {
        let registry = AccessorRegistry::<Center>::from_record().computed(
            "occupancy_rate",
            FieldKind::Number,
            |c| Value::Number(Number::F64(c.occupied as f64 / c.capacity as f64 * 100.0)),
        );
        let c = center();
        assert_eq!(
            registry.resolve(&c, "occupancy_rate"),
            Value::Number(Number::F64(25.0))
        );
        assert!(registry.get("occupancy_rate").unwrap().is_computed());
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn unregistered_fields_resolve_to_none() {
        let registry = AccessorRegistry::<Center>::new().raw("name", FieldKind::Text);
        assert!(registry.resolve(&center(), "capacity").is_none());
        assert!(!registry.contains("capacity"));
    }

    #[test]
    fn coerce_by_kind() {
        assert_eq!(
            FieldKind::Number.coerce(Value::from("42")),
            Value::Number(Number::I64(42))
        );
        assert_eq!(FieldKind::Number.coerce(Value::from("n/a")), Value::from("n/a"));
        assert_eq!(
            FieldKind::Date.coerce(Value::Number(Number::I64(1000))),
            Value::Timestamp(Timestamp(1000))
        );
        assert_eq!(FieldKind::Text.coerce(Value::from("42")), Value::from("42"));
    }

    #[test]
    fn kind_accepts_matching_shapes() {
        assert!(FieldKind::Number.accepts(&Value::Number(Number::I64(1))));
        assert!(!FieldKind::Number.accepts(&Value::from("1")));
        assert!(FieldKind::Tags.accepts(&Value::Tags(vec![])));
        assert!(!FieldKind::Date.accepts(&Value::None));
    }

    #[test]
    fn field_kind_serde_names() {
        assert_eq!(serde_json::to_string(&FieldKind::Date).unwrap(), "\"date\"");
        let kind: FieldKind = serde_json::from_str("\"tags\"").unwrap();
        assert_eq!(kind, FieldKind::Tags);
    }
}
