//! Query state and execution.
//!
//! A [`Query`] is the whole list state of one screen: the filters, the
//! active sort key and the requested page. It is a plain serializable value;
//! the engine keeps nothing between calls.

use serde::{Deserialize, Serialize};

use crate::accessor::AccessorRegistry;
use crate::clause::{FilterClause, Scalar};
use crate::error::{QueryError, Result};
use crate::filter::FilterSet;
use crate::ordering::{sort_records, Direction, SortSpec};
use crate::page::{paginate, Page, ResultView};

/// Filters, sort and page for one list view.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tanaw_query::{AccessorRegistry, FieldKind, Query};
///
/// let centers = vec![
///     json!({ "name": "San Jose Center", "barangay": "Poblacion", "capacity": 120 }),
///     json!({ "name": "Central Hall", "barangay": "San Roque", "capacity": 300 }),
///     json!({ "name": "Riverside Gym", "barangay": "Ilaya", "capacity": 80 }),
/// ];
/// let accessors = AccessorRegistry::new()
///     .raw("name", FieldKind::Text)
///     .raw("barangay", FieldKind::Text)
///     .raw("capacity", FieldKind::Number);
///
/// let view = Query::new()
///     .any_of(["name", "barangay"], "san")
///     .sort_desc("capacity")
///     .page(1, 10)
///     .run(&centers, &accessors)
///     .unwrap();
///
/// assert_eq!(view.total_matched, 2);
/// assert_eq!(view.items[0]["name"], "Central Hall");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    filters: FilterSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sort: Option<SortSpec>,
    #[serde(default)]
    page: Page,
}

impl Query {
    /// Creates a query with no filters, no sort and the default first page.
    pub fn new() -> Self {
        Query::default()
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Adds a filter clause.
    pub fn filter(mut self, clause: FilterClause) -> Self {
        self.filters.push(clause);
        self
    }

    /// Adds an exact-match clause.
    pub fn equals(self, field: &str, value: impl Into<Scalar>) -> Self {
        self.filter(FilterClause::equals(field, value))
    }

    /// Adds a case-insensitive substring clause.
    pub fn contains(self, field: &str, needle: &str) -> Self {
        self.filter(FilterClause::contains(field, needle))
    }

    /// Adds a range clause with both bounds.
    pub fn between(self, field: &str, min: impl Into<Scalar>, max: impl Into<Scalar>) -> Self {
        self.filter(FilterClause::range(field, Some(min.into()), Some(max.into())))
    }

    /// Adds a lower-bound range clause.
    pub fn at_least(self, field: &str, min: impl Into<Scalar>) -> Self {
        self.filter(FilterClause::range(field, Some(min.into()), None))
    }

    /// Adds an upper-bound range clause.
    pub fn at_most(self, field: &str, max: impl Into<Scalar>) -> Self {
        self.filter(FilterClause::range(field, None, Some(max.into())))
    }

    /// Adds a tag-membership clause.
    pub fn includes_tag(self, field: &str, tag: &str) -> Self {
        self.filter(FilterClause::includes_tag(field, tag))
    }

    /// Adds a multi-field free-text clause.
    pub fn any_of<I, S>(self, fields: I, needle: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter(FilterClause::any_of(fields, needle))
    }

    /// Replaces all filters.
    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    // ========================================================================
    // Sort
    // ========================================================================

    /// Sets the sort key, replacing any previous one.
    pub fn sort_by(mut self, field: &str, direction: Direction) -> Self {
        self.sort = Some(SortSpec::new(field, direction));
        self
    }

    /// Sets an ascending sort key.
    pub fn sort_asc(self, field: &str) -> Self {
        self.sort_by(field, Direction::Asc)
    }

    /// Sets a descending sort key.
    pub fn sort_desc(self, field: &str) -> Self {
        self.sort_by(field, Direction::Desc)
    }

    /// Applies a column click: same key flips direction, a new key sorts
    /// ascending. Returns to the first page, since the order changed.
    pub fn toggle_sort(mut self, field: &str) -> Self {
        self.sort = Some(match &self.sort {
            Some(current) => current.toggle(field),
            None => SortSpec::asc(field),
        });
        self.page.number = 1;
        self
    }

    /// Removes the sort key; results keep their input order.
    pub fn unsorted(mut self) -> Self {
        self.sort = None;
        self
    }

    // ========================================================================
    // Page
    // ========================================================================

    /// Sets the requested page.
    pub fn page(mut self, number: usize, size: usize) -> Self {
        self.page = Page::new(number, size);
        self
    }

    /// Sets the requested page from a [`Page`].
    pub fn with_page(mut self, page: Page) -> Self {
        self.page = page;
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// The filter set.
    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// The active sort key, if any.
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// The requested page.
    pub fn current_page(&self) -> Page {
        self.page
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single record passes the filters.
    pub fn matches<T>(&self, record: &T, accessors: &AccessorRegistry<T>) -> bool {
        self.filters.evaluate(record, accessors)
    }

    /// Counts the records that pass the filters.
    pub fn count<T>(&self, records: &[T], accessors: &AccessorRegistry<T>) -> usize {
        records
            .iter()
            .filter(|record| self.matches(*record, accessors))
            .count()
    }

    /// All matching records in sorted order, without pagination.
    pub fn sorted<'r, T>(
        &self,
        records: &'r [T],
        accessors: &AccessorRegistry<T>,
    ) -> Result<Vec<&'r T>> {
        for clause in self.filters.clauses().iter().filter(|c| c.is_noop()) {
            tracing::trace!(clause = %clause, "skipping unconstrained clause");
        }

        let matched: Vec<&'r T> = records
            .iter()
            .filter(|record| self.matches(*record, accessors))
            .collect();

        match &self.sort {
            Some(spec) => sort_records(matched, spec, accessors),
            None => Ok(matched),
        }
    }

    /// Filters, sorts and paginates `records`.
    ///
    /// The caller's slice is never reordered. Fails only on configuration
    /// errors: a zero page size or number, or a sort field with no accessor.
    pub fn run<'r, T>(
        &self,
        records: &'r [T],
        accessors: &AccessorRegistry<T>,
    ) -> Result<ResultView<&'r T>> {
        let page = self.page.validate()?;
        if let Some(spec) = &self.sort {
            // Fail before filtering, even when nothing would match.
            if !accessors.contains(&spec.field) {
                return Err(QueryError::UnknownSortField {
                    field: spec.field.clone(),
                });
            }
        }

        let sorted = self.sorted(records, accessors)?;
        let view = paginate(sorted, page)?;

        tracing::debug!(
            records = records.len(),
            matched = view.total_matched,
            page = page.number,
            total_pages = view.total_pages,
            sort = ?self.sort,
            "list query evaluated"
        );
        Ok(view)
    }
}

/// Runs one list query: filter, sort a copy, paginate.
///
/// Equivalent to building a [`Query`] from the parts and calling
/// [`Query::run`].
pub fn query<'r, T>(
    records: &'r [T],
    filters: &FilterSet,
    sort: Option<&SortSpec>,
    page: Page,
    accessors: &AccessorRegistry<T>,
) -> Result<ResultView<&'r T>> {
    let state = Query {
        filters: filters.clone(),
        sort: sort.cloned(),
        page,
    };
    state.run(records, accessors)
}
