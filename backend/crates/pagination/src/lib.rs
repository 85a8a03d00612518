//! Limit/page pagination primitives shared by backend endpoints.
//!
//! A [`PageWindow`] is a validated `limit`/`page` pair translated into SQL
//! `LIMIT`/`OFFSET` terms. [`Paginated`] is the envelope pairing one page of
//! items with the total row count the window was cut from, so clients can
//! render page controls without a second request.

use serde::Serialize;

/// Validation failures for [`PageWindow`] construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageWindowError {
    /// `limit` was zero or negative.
    #[error("limit must be a positive integer")]
    InvalidLimit,
    /// `page` was zero or negative.
    #[error("page must be a positive integer")]
    InvalidPage,
}

/// A validated limit/page window over an ordered result set.
///
/// ## Invariants
/// - `limit >= 1` and `page >= 1` (enforced by [`PageWindow::new`]).
///
/// # Examples
/// ```
/// use pagination::PageWindow;
///
/// let window = PageWindow::new(10, 3).expect("valid window");
/// assert_eq!(window.offset(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    limit: i64,
    page: i64,
}

impl PageWindow {
    /// Build a window from raw `limit` and `page` values.
    ///
    /// # Errors
    ///
    /// Returns [`PageWindowError::InvalidLimit`] or
    /// [`PageWindowError::InvalidPage`] when either value is not positive.
    pub fn new(limit: i64, page: i64) -> Result<Self, PageWindowError> {
        if limit < 1 {
            return Err(PageWindowError::InvalidLimit);
        }
        if page < 1 {
            return Err(PageWindowError::InvalidPage);
        }
        Ok(Self { limit, page })
    }

    /// Maximum number of items on this page.
    pub fn limit(self) -> i64 {
        self.limit
    }

    /// One-based page index.
    pub fn page(self) -> i64 {
        self.page
    }

    /// Number of rows to skip before this page starts.
    ///
    /// Saturates rather than wrapping for absurdly large windows; a saturated
    /// offset lands past the end of any real table and yields an empty page.
    pub fn offset(self) -> i64 {
        self.limit.saturating_mul(self.page - 1)
    }
}

/// One page of items plus the total row count of the unpaged result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    /// The items on this page, in the query's order.
    pub items: Vec<T>,
    /// Total number of rows the window was cut from.
    pub total_count: i64,
}

impl<T> Paginated<T> {
    /// An empty result set.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 1, 0)]
    #[case(10, 1, 0)]
    #[case(10, 3, 20)]
    #[case(5, 7, 30)]
    fn offset_skips_preceding_pages(#[case] limit: i64, #[case] page: i64, #[case] expected: i64) {
        let window = PageWindow::new(limit, page).expect("valid window");
        assert_eq!(window.offset(), expected);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(-5, 1)]
    fn rejects_non_positive_limit(#[case] limit: i64, #[case] page: i64) {
        assert_eq!(
            PageWindow::new(limit, page),
            Err(PageWindowError::InvalidLimit)
        );
    }

    #[rstest]
    #[case(10, 0)]
    #[case(10, -2)]
    fn rejects_non_positive_page(#[case] limit: i64, #[case] page: i64) {
        assert_eq!(
            PageWindow::new(limit, page),
            Err(PageWindowError::InvalidPage)
        );
    }

    #[rstest]
    fn offset_saturates_instead_of_wrapping() {
        let window = PageWindow::new(i64::MAX, 2).expect("valid window");
        assert_eq!(window.offset(), i64::MAX);
    }

    #[rstest]
    fn empty_envelope_has_zero_total() {
        let page: Paginated<u8> = Paginated::empty();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
    }
}
