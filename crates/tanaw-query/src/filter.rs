//! Filter sets: clauses combined with logical AND.

use serde::{Deserialize, Serialize};

use crate::accessor::AccessorRegistry;
use crate::clause::FilterClause;

/// An ordered collection of [`FilterClause`]s combined with logical AND.
///
/// Clause order never changes which records pass; evaluation stops at the
/// first failing clause, so cheap or selective clauses are best placed first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    clauses: Vec<FilterClause>,
}

impl FilterSet {
    /// Creates an empty filter set, which passes every record.
    pub fn new() -> Self {
        FilterSet::default()
    }

    /// Appends a clause.
    pub fn with(mut self, clause: FilterClause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Appends a clause in place.
    pub fn push(&mut self, clause: FilterClause) {
        self.clauses.push(clause);
    }

    /// The clauses, in evaluation order.
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// Number of clauses, including no-ops.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns `true` if there are no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns `true` if every clause is a no-op.
    pub fn is_unconstrained(&self) -> bool {
        self.clauses.iter().all(FilterClause::is_noop)
    }

    /// Clauses that actually constrain the result.
    pub fn active(&self) -> impl Iterator<Item = &FilterClause> {
        self.clauses.iter().filter(|clause| !clause.is_noop())
    }

    /// Returns `true` if `record` passes every non-skipped clause.
    pub fn evaluate<T>(&self, record: &T, accessors: &AccessorRegistry<T>) -> bool {
        self.active().all(|clause| clause.matches(record, accessors))
    }
}

impl From<Vec<FilterClause>> for FilterSet {
    fn from(clauses: Vec<FilterClause>) -> Self {
        FilterSet { clauses }
    }
}

impl FromIterator<FilterClause> for FilterSet {
    fn from_iter<I: IntoIterator<Item = FilterClause>>(iter: I) -> Self {
        FilterSet {
            clauses: iter.into_iter().collect(),
        }
    }
}

impl Extend<FilterClause> for FilterSet {
    fn extend<I: IntoIterator<Item = FilterClause>>(&mut self, iter: I) {
        self.clauses.extend(iter);
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a FilterClause;
    type IntoIter = std::slice::Iter<'a, FilterClause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::FieldKind;
    use crate::clause::ALL;
    use serde_json::{json, Value as Json};

    fn registry() -> AccessorRegistry<Json> {
        AccessorRegistry::new()
            .raw("title", FieldKind::Text)
            .raw("severity", FieldKind::Text)
            .raw("families", FieldKind::Number)
    }

    fn incident() -> Json {
        json!({ "title": "Flash flood in Sitio Ilaya", "severity": "high", "families": 42 })
    }

    #[test]
    fn empty_set_passes() {
        assert!(FilterSet::new().evaluate(&incident(), &registry()));
    }

    #[test]
    fn all_clauses_must_pass() {
        let set = FilterSet::new()
            .with(FilterClause::equals("severity", "high"))
            .with(FilterClause::contains("title", "flood"));
        assert!(set.evaluate(&incident(), &registry()));

        let set = set.with(FilterClause::range("families", Some(50.into()), None));
        assert!(!set.evaluate(&incident(), &registry()));
    }

    #[test]
    fn clause_order_does_not_change_result() {
        let a = FilterClause::equals("severity", "low");
        let b = FilterClause::contains("title", "flood");
        let forward: FilterSet = vec![a.clone(), b.clone()].into();
        let backward: FilterSet = vec![b, a].into();
        assert_eq!(
            forward.evaluate(&incident(), &registry()),
            backward.evaluate(&incident(), &registry())
        );
    }

    #[test]
    fn sentinel_clauses_are_skipped() {
        let set: FilterSet = [
            FilterClause::equals("severity", ALL),
            FilterClause::contains("title", ""),
            FilterClause::includes_tag("tags", ALL),
        ]
        .into_iter()
        .collect();
        assert!(set.is_unconstrained());
        assert_eq!(set.active().count(), 0);
        assert!(set.evaluate(&json!({}), &registry()));
    }

    #[test]
    fn serializes_as_a_list() {
        let set = FilterSet::new().with(FilterClause::equals("severity", "high"));
        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            json!([{ "op": "equals", "field": "severity", "value": "high" }])
        );
    }
}
