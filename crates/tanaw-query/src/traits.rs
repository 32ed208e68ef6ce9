//! Traits for record field access.
//!
//! [`Record`] is implemented by the `#[derive(Record)]` macro (or by hand)
//! to expose a record's fields by name. [`ToValue`] converts individual field
//! types into [`Value`]s and is what the derive macro calls for each field.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::accessor::FieldKind;
use crate::value::{Number, Timestamp, Value};

/// A record that can be filtered, sorted and paginated by field name.
///
/// This trait is typically derived using `#[derive(Record)]` from the
/// `tanaw-macros` crate, but can also be implemented manually.
///
/// # Derive Usage
///
/// ```ignore
/// use tanaw_query::{AccessorRegistry, Query, Record};
///
/// #[derive(Record)]
/// struct Center {
///     #[field(Text)]
///     name: String,
///     #[field(Number)]
///     capacity: u32,
///     #[field(Tags)]
///     facilities: Vec<String>,
/// }
///
/// let accessors = AccessorRegistry::<Center>::from_record();
/// let view = Query::new()
///     .includes_tag(Center::FACILITIES, "clinic")
///     .sort_desc(Center::CAPACITY)
///     .run(&centers, &accessors)?;
/// ```
///
/// # Manual Implementation
///
/// ```
/// use std::borrow::Cow;
/// use tanaw_query::{FieldKind, Number, Record, Value};
///
/// struct Center {
///     name: String,
///     capacity: u32,
/// }
///
/// impl Record for Center {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(Cow::Borrowed(&self.name)),
///             "capacity" => Value::Number(Number::from(self.capacity)),
///             _ => Value::None,
///         }
///     }
///
///     fn field_kinds() -> &'static [(&'static str, FieldKind)] {
///         &[("name", FieldKind::Text), ("capacity", FieldKind::Number)]
///     }
/// }
/// ```
pub trait Record {
    /// Returns the raw value of a field.
    ///
    /// Returns [`Value::None`] if the field doesn't exist or holds no value.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// The statically known fields of this record type and their kinds.
    ///
    /// Used by [`AccessorRegistry::from_record`](crate::AccessorRegistry::from_record).
    /// Schemaless records (such as JSON objects) keep the empty default and
    /// register their fields explicitly.
    fn field_kinds() -> &'static [(&'static str, FieldKind)]
    where
        Self: Sized,
    {
        &[]
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}

/// Conversion of a field into a [`Value`] borrowing from it.
///
/// Implemented for the common field types; `Option<T>` maps `None` to
/// [`Value::None`] so optional fields read as missing.
pub trait ToValue {
    /// Returns this field as a comparable value.
    fn to_value(&self) -> Value<'_>;
}

impl ToValue for str {
    fn to_value(&self) -> Value<'_> {
        Value::String(Cow::Borrowed(self))
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value<'_> {
        Value::String(Cow::Borrowed(self.as_str()))
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl ToValue for Number {
    fn to_value(&self) -> Value<'_> {
        Value::Number(*self)
    }
}

impl ToValue for Timestamp {
    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(*self)
    }
}

impl ToValue for NaiveDate {
    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(Timestamp::from(*self))
    }
}

impl ToValue for NaiveDateTime {
    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(Timestamp::from(*self))
    }
}

impl<Tz: chrono::TimeZone> ToValue for DateTime<Tz> {
    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(Timestamp(self.timestamp_millis()))
    }
}

impl ToValue for Vec<String> {
    fn to_value(&self) -> Value<'_> {
        Value::Tags(self.iter().map(|s| Cow::Borrowed(s.as_str())).collect())
    }
}

impl ToValue for [String] {
    fn to_value(&self) -> Value<'_> {
        Value::Tags(self.iter().map(|s| Cow::Borrowed(s.as_str())).collect())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::None,
        }
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

macro_rules! number_to_value {
    ($($t:ty),*) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

number_to_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    struct Center {
        name: String,
        capacity: i32,
        manager: Option<String>,
    }

    impl Record for Center {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => self.name.to_value(),
                "capacity" => self.capacity.to_value(),
                "manager" => self.manager.to_value(),
                _ => Value::None,
            }
        }
    }

    fn center() -> Center {
        Center {
            name: "San Jose Center".to_string(),
            capacity: 200,
            manager: None,
        }
    }

    #[test]
    fn record_manual_impl() {
        let c = center();
        assert_eq!(c.field_value("name"), Value::from("San Jose Center"));
        assert_eq!(
            c.field_value("capacity"),
            Value::Number(Number::I64(200))
        );
        assert_eq!(c.field_value("unknown"), Value::None);
    }

    #[test]
    fn optional_fields_read_as_missing() {
        let mut c = center();
        assert!(c.field_value("manager").is_none());
        c.manager = Some("Dela Cruz".to_string());
        assert_eq!(c.field_value("manager"), Value::from("Dela Cruz"));
    }

    #[test]
    fn record_by_reference() {
        let c = center();
        let r = &c;
        assert_eq!(Record::field_value(&r, "capacity").as_number(), Some(Number::I64(200)));
    }

    #[test]
    fn default_field_kinds_empty() {
        assert!(Center::field_kinds().is_empty());
    }

    #[test]
    fn tags_to_value() {
        let tags = vec!["flood".to_string(), "landslide".to_string()];
        let value = tags.to_value();
        assert_eq!(value.as_tags().map(|t| t.len()), Some(2));
    }

    #[test]
    fn dates_to_value() {
        let date = NaiveDate::from_ymd_opt(2024, 10, 22).unwrap();
        assert_eq!(
            date.to_value().as_timestamp(),
            Timestamp::parse("2024-10-22")
        );
    }
}
