//! Error types for the query crate.

use thiserror::Error;

/// Errors raised for query configuration mistakes.
///
/// Data problems (missing fields, values of the wrong type) never produce
/// errors: they fail the filter clause or sort last.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Page size must be at least one.
    #[error("invalid page size {0}: must be at least 1")]
    InvalidPageSize(usize),

    /// Page numbers are 1-based.
    #[error("invalid page number 0: pages are numbered from 1")]
    InvalidPageNumber,

    /// The active sort key has no registered accessor.
    #[error("no accessor registered for sort field '{field}'")]
    UnknownSortField { field: String },
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            QueryError::InvalidPageSize(0).to_string(),
            "invalid page size 0: must be at least 1"
        );
        assert_eq!(
            QueryError::UnknownSortField {
                field: "occupancy_rate".into()
            }
            .to_string(),
            "no accessor registered for sort field 'occupancy_rate'"
        );
    }
}
