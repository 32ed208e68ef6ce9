//! Pagination.
//!
//! The paginator never clamps: asking for a page past the end yields an empty
//! slice with the true totals, and the caller decides whether to snap back
//! (see [`Page::clamp_to`]).

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Page {
    /// Page number, starting at 1.
    pub number: usize,
    /// Items per page, at least 1.
    pub size: usize,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            number: 1,
            size: Page::DEFAULT_SIZE,
        }
    }
}

impl Page {
    /// Page size used when none is given.
    pub const DEFAULT_SIZE: usize = 10;

    /// Creates a page request. Validation happens when the page is used.
    pub fn new(number: usize, size: usize) -> Self {
        Page { number, size }
    }

    /// The first page of the given size.
    pub fn first(size: usize) -> Self {
        Page::new(1, size)
    }

    /// Checks the page invariants: `size >= 1` and `number >= 1`.
    pub fn validate(self) -> Result<Self> {
        if self.size == 0 {
            return Err(QueryError::InvalidPageSize(self.size));
        }
        if self.number == 0 {
            return Err(QueryError::InvalidPageNumber);
        }
        Ok(self)
    }

    /// Index of the first item on this page.
    pub fn offset(self) -> usize {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }

    /// This page moved into `1..=total_pages`.
    ///
    /// ```
    /// use tanaw_query::Page;
    ///
    /// assert_eq!(Page::new(5, 10).clamp_to(2), Page::new(2, 10));
    /// assert_eq!(Page::new(0, 10).clamp_to(2), Page::new(1, 10));
    /// ```
    pub fn clamp_to(self, total_pages: usize) -> Page {
        Page::new(self.number.clamp(1, total_pages.max(1)), self.size)
    }
}

/// Number of pages needed for `total` items: `max(1, ceil(total / size))`.
///
/// `size` must be non-zero.
pub fn total_pages(total: usize, size: usize) -> usize {
    total.div_ceil(size).max(1)
}

/// One page of results plus the totals needed to drive pagination controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView<T> {
    /// The items on the requested page.
    pub items: Vec<T>,
    /// Number of records that passed the filters.
    pub total_matched: usize,
    /// Number of pages, at least 1.
    pub total_pages: usize,
}

impl<T> ResultView<T> {
    /// Returns `true` if the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items on the page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if `page` lies past the last page of this result.
    pub fn is_out_of_range(&self, page: Page) -> bool {
        page.number > self.total_pages
    }

    /// Maps the items, keeping the totals.
    pub fn map<U, F>(self, f: F) -> ResultView<U>
    where
        F: FnMut(T) -> U,
    {
        ResultView {
            items: self.items.into_iter().map(f).collect(),
            total_matched: self.total_matched,
            total_pages: self.total_pages,
        }
    }
}

/// Slices one page out of an already filtered and sorted sequence.
///
/// Fails only on an invalid page request.
pub fn paginate<T>(sequence: Vec<T>, page: Page) -> Result<ResultView<T>> {
    let page = page.validate()?;
    let total_matched = sequence.len();
    let total_pages = total_pages(total_matched, page.size);

    let start = page.offset();
    let items = if start >= total_matched {
        Vec::new()
    } else {
        sequence.into_iter().skip(start).take(page.size).collect()
    };

    Ok(ResultView {
        items,
        total_matched,
        total_pages,
    })
}
