//! Result pages.

/// One page of query results plus the counts needed to render pagination.
///
/// `items` never holds more than `page_size` entries. Asking for a page past
/// the end yields empty `items` with the same `total_matched` and
/// `total_pages` as page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ResultPage<T> {
    /// Records on this page, in sorted order.
    pub items: Vec<T>,
    /// Number of records that passed filters and search.
    pub total_matched: usize,
    /// `ceil(total_matched / page_size)`; zero when nothing matched.
    pub total_pages: usize,
    /// The 1-indexed page that was requested.
    pub page: usize,
    /// The page size that was requested.
    pub page_size: usize,
}

impl<T> ResultPage<T> {
    /// Cuts page `page` out of an already filtered and sorted result set.
    ///
    /// `page` must be at least 1 and `page_size` greater than 0; the query
    /// validates both before calling this.
    pub(crate) fn slice(sorted: Vec<T>, page: usize, page_size: usize) -> Self {
        let total_matched = sorted.len();
        let start = (page - 1).saturating_mul(page_size);
        let items = sorted.into_iter().skip(start).take(page_size).collect();

        ResultPage {
            items,
            total_matched,
            total_pages: total_pages(total_matched, page_size),
            page,
            page_size,
        }
    }

    /// Returns `true` if this page holds no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if a later page has records.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Returns `true` if an earlier page has records.
    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }

    /// Transforms every item, keeping the counts.
    pub fn map<U, F>(self, f: F) -> ResultPage<U>
    where
        F: FnMut(T) -> U,
    {
        ResultPage {
            items: self.items.into_iter().map(f).collect(),
            total_matched: self.total_matched,
            total_pages: self.total_pages,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

impl<T: Clone> ResultPage<&T> {
    /// Clones the referenced records into an owned page.
    pub fn cloned(self) -> ResultPage<T> {
        self.map(T::clone)
    }
}

/// Number of pages needed for `total_matched` records.
///
/// Returns 0 when `page_size` is 0.
pub fn total_pages(total_matched: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_matched.div_ceil(page_size)
}
