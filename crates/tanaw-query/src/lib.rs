//! Tanaw Query - filter, sort and paginate in-memory record lists.
//!
//! Every list screen of the dashboard runs the same pipeline over a slice of
//! records it already holds in memory:
//!
//! - **Filter**: keep records passing every active [`FilterClause`]
//! - **Sort**: order a copy by a single [`SortSpec`], stable, missing values last
//! - **Paginate**: slice one [`Page`] and report the totals in a [`ResultView`]
//!
//! Records are read through an [`AccessorRegistry`], a table of named field
//! accessors. Fields can be raw (read off the record) or computed (derived,
//! like an occupancy rate). Each accessor declares a [`FieldKind`], which
//! drives value coercion for filtering and ordering.
//!
//! # Quick Start
//!
//! ```rust
//! use tanaw_query::{AccessorRegistry, FieldKind, Number, Query, Value};
//!
//! struct Center {
//!     name: String,
//!     barangay: String,
//!     capacity: u32,
//!     occupied: u32,
//! }
//!
//! let accessors = AccessorRegistry::new()
//!     .register("name", FieldKind::Text, |c: &Center| Value::from(c.name.as_str()))
//!     .register("barangay", FieldKind::Text, |c: &Center| Value::from(c.barangay.as_str()))
//!     .computed("occupancy_rate", FieldKind::Number, |c: &Center| {
//!         if c.capacity == 0 {
//!             return Value::None;
//!         }
//!         Value::Number(Number::F64(c.occupied as f64 / c.capacity as f64 * 100.0))
//!     });
//!
//! let centers = vec![
//!     Center { name: "San Jose ES".into(), barangay: "Poblacion".into(), capacity: 200, occupied: 150 },
//!     Center { name: "Covered Court".into(), barangay: "San Roque".into(), capacity: 100, occupied: 95 },
//!     Center { name: "Parish Hall".into(), barangay: "Ilaya".into(), capacity: 80, occupied: 10 },
//! ];
//!
//! let view = Query::new()
//!     .any_of(["name", "barangay"], "san")
//!     .at_least("occupancy_rate", 50)
//!     .sort_desc("occupancy_rate")
//!     .page(1, 10)
//!     .run(&centers, &accessors)
//!     .unwrap();
//!
//! assert_eq!(view.total_matched, 2);
//! assert_eq!(view.items[0].name, "Covered Court");
//! ```
//!
//! # Filter Semantics
//!
//! Clauses in a [`FilterSet`] combine with logical AND. A clause whose value
//! is the sentinel [`ALL`] or an empty string is skipped entirely.
//!
//! | Clause | Passes when | Skipped when |
//! |--------|-------------|--------------|
//! | `Equals` | value equals the target exactly | target is `"all"` or `""` |
//! | `Contains` | needle is a case-insensitive substring | needle is `""` |
//! | `Range` | value within the inclusive bounds | both bounds absent or blank |
//! | `IncludesTag` | tag list contains the tag | tag is `"all"` or `""` |
//! | `AnyOf` | needle is a substring of any listed field | needle is `""` |
//!
//! A missing field, or a value that cannot be read as the field's kind,
//! fails the clause. It never raises an error.
//!
//! # Ordering
//!
//! Text compares lexicographically, numbers numerically and dates
//! chronologically (ISO strings are parsed once per record per query).
//! Missing, NaN, and wrongly-typed values sort after all others in both
//! directions. Ties keep their input order.
//!
//! # Errors
//!
//! Only configuration mistakes fail a query, see [`QueryError`].
//!
//! # Derive
//!
//! With the `derive` feature, `#[derive(Record)]` implements [`Record`] for a
//! struct, and [`AccessorRegistry::from_record`] registers every field.

mod accessor;
mod clause;
mod error;
mod filter;
mod json;
mod ordering;
mod page;
mod query;
mod traits;
mod value;

// Re-export public API
pub use accessor::{Accessor, AccessorRegistry, FieldKind};
pub use clause::{FilterClause, Scalar, ALL};
pub use error::{QueryError, Result};
pub use filter::FilterSet;
pub use json::json_to_value;
pub use ordering::{build_comparator, compare_values, sort_records, Direction, SortSpec};
pub use page::{paginate, total_pages, Page, ResultView};
pub use query::{query, Query};
pub use traits::{Record, ToValue};
pub use value::{Number, Timestamp, Value};

// Record derive macro (requires `features = ["derive"]`)
#[cfg(feature = "derive")]
pub use tanaw_macros::Record;
