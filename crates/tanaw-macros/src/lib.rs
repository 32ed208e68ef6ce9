//! Proc macros for Tanaw.
//!
//! # Derive Macros
//!
//! - [`Record`] - Expose struct fields to the `tanaw-query` list engine

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` trait for list records.
///
/// This macro generates an implementation of `tanaw_query::Record`, so the
/// struct can be read by name through an `AccessorRegistry`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `Text` | Free text (equality, substring search, lexicographic sort) |
/// | `Number` | Integer or float, or a numeric string |
/// | `Date` | ISO-8601 string, chrono date type, or epoch millis |
/// | `Bool` | Boolean flag |
/// | `Tags` | `Vec<String>` (tag membership, substring search) |
/// | `skip` | Exclude this field from queries |
/// | `rename = "..."` | Use a custom name for queries |
/// | `kind = "..."` | Kind given as a string, e.g. `kind = "date"` |
///
/// Fields without a `#[field(...)]` attribute are not queryable.
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Incident::TITLE`, `Incident::REPORTED_AT`)
/// 2. `Record::field_value()`, reading each field through `ToValue`
/// 3. `Record::field_kinds()`, used by `AccessorRegistry::from_record()`
///
/// # Example
///
/// ```ignore
/// use tanaw_query::{AccessorRegistry, Query, Record};
///
/// #[derive(Record)]
/// struct Incident {
///     #[field(Text)]
///     title: String,
///
///     #[field(Date)]
///     reported_at: String,
///
///     #[field(Tags)]
///     tags: Vec<String>,
///
///     #[field(skip)]
///     notes: String,
/// }
///
/// let accessors = AccessorRegistry::<Incident>::from_record();
/// let view = Query::new()
///     .includes_tag(Incident::TAGS, "flood")
///     .sort_desc(Incident::REPORTED_AT)
///     .run(&incidents, &accessors)?;
/// ```
#[proc_macro_derive(Record, attributes(field))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
