//! Page-window and pagination envelope primitives shared by list endpoints.
//!
//! Endpoints accept a 1-based `page` and a `limit` from the query string,
//! convert them into a skip/limit window for the store, and report the
//! resulting [`PageInfo`] block inside the response envelope. Keeping the
//! arithmetic here means every resource paginates identically.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Largest number of records a single page may request.
pub const MAX_LIMIT: u32 = 100;

/// Page size applied when the caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 10;

/// Validation failures raised when constructing a [`PageRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Pages are 1-based; zero is a caller error rather than an alias for
    /// the first page.
    #[error("page must be at least 1")]
    PageOutOfRange,
    /// Limit must sit inside `1..=MAX_LIMIT`.
    #[error("limit must be between 1 and {MAX_LIMIT}")]
    LimitOutOfRange,
}

/// Validated page window requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate and construct a page window.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let window = PageRequest::new(3, 20)?;
    /// assert_eq!(window.skip(), 40);
    /// # Ok::<(), pagination::PageRequestError>(())
    /// ```
    pub fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange);
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PageRequestError::LimitOutOfRange);
        }
        Ok(Self { page, limit })
    }

    /// Window with defaults applied for omitted parameters.
    pub fn from_params(
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Self, PageRequestError> {
        Self::new(page.unwrap_or(1), limit.unwrap_or(DEFAULT_LIMIT))
    }

    /// 1-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Records per page.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records to skip before this page starts.
    #[must_use]
    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Pagination block reported alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Total records matching the query across all pages.
    #[schema(example = 132)]
    pub total: u64,
    /// 1-based page number that was returned.
    #[schema(example = 2)]
    pub page: u32,
    /// Records per page that was applied.
    #[schema(example = 10)]
    pub limit: u32,
    /// Number of pages required to cover `total` records.
    #[schema(example = 14)]
    pub total_pages: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

impl PageInfo {
    /// Derive the pagination block for a window and a total count.
    ///
    /// An empty result set still reports one (empty) page so that clients
    /// can render a stable pager.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageInfo, PageRequest};
    ///
    /// let window = PageRequest::new(2, 10)?;
    /// let info = PageInfo::for_page(&window, 25);
    /// assert_eq!(info.total_pages, 3);
    /// assert!(info.has_next);
    /// assert!(info.has_prev);
    /// # Ok::<(), pagination::PageRequestError>(())
    /// ```
    #[must_use]
    pub fn for_page(window: &PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(window.limit())).max(1);
        let page = window.page();
        Self {
            total,
            page,
            limit: window.limit(),
            total_pages,
            has_next: u64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(5, 25, 100)]
    fn skip_reflects_page_and_limit(#[case] page: u32, #[case] limit: u32, #[case] skip: u64) {
        let window = PageRequest::new(page, limit).expect("valid window");
        assert_eq!(window.skip(), skip);
    }

    #[rstest]
    #[case(0, 10, PageRequestError::PageOutOfRange)]
    #[case(1, 0, PageRequestError::LimitOutOfRange)]
    #[case(1, MAX_LIMIT + 1, PageRequestError::LimitOutOfRange)]
    fn out_of_range_windows_are_rejected(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: PageRequestError,
    ) {
        assert_eq!(PageRequest::new(page, limit), Err(expected));
    }

    #[test]
    fn defaults_apply_when_params_are_omitted() {
        let window = PageRequest::from_params(None, None).expect("defaults are valid");
        assert_eq!(window.page(), 1);
        assert_eq!(window.limit(), DEFAULT_LIMIT);
    }

    #[rstest]
    #[case(25, 2, 10, 3, true, true)]
    #[case(25, 3, 10, 3, false, true)]
    #[case(0, 1, 10, 1, false, false)]
    #[case(10, 1, 10, 1, false, false)]
    fn page_info_derives_bounds(
        #[case] total: u64,
        #[case] page: u32,
        #[case] limit: u32,
        #[case] total_pages: u64,
        #[case] has_next: bool,
        #[case] has_prev: bool,
    ) {
        let window = PageRequest::new(page, limit).expect("valid window");
        let info = PageInfo::for_page(&window, total);
        assert_eq!(info.total_pages, total_pages);
        assert_eq!(info.has_next, has_next);
        assert_eq!(info.has_prev, has_prev);
        assert_eq!(info.total, total);
    }
}
