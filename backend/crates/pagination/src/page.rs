//! Page envelope and page-size limits.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validated number of items returned per page.
///
/// # Examples
///
/// ```
/// use pagination::PageSize;
///
/// let size = PageSize::new(25).expect("within bounds");
/// assert_eq!(size.get(), 25);
/// assert!(PageSize::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

/// Rejection raised by [`PageSize::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageSizeError {
    /// Zero-sized pages would never make progress.
    #[error("page size must be at least 1")]
    Zero,
    /// Requested size exceeds [`PageSize::MAX`].
    #[error("page size must be at most {max}, got {requested}")]
    TooLarge {
        /// Size that was requested.
        requested: u32,
        /// Largest accepted size.
        max: u32,
    },
}

impl PageSize {
    /// Largest page any backend will serve.
    pub const MAX: u32 = 1000;

    /// Page size used when configuration does not provide one.
    pub const DEFAULT: Self = Self(50);

    /// Validate a page size.
    ///
    /// # Errors
    ///
    /// Returns [`PageSizeError`] for zero or sizes above [`PageSize::MAX`].
    pub const fn new(size: u32) -> Result<Self, PageSizeError> {
        match size {
            0 => Err(PageSizeError::Zero),
            requested if requested > Self::MAX => Err(PageSizeError::TooLarge {
                requested,
                max: Self::MAX,
            }),
            valid => Ok(Self(valid)),
        }
    }

    /// Raw page size.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Page size as a collection length.
    #[must_use]
    pub fn as_usize(self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }

    /// Row limit for queries that fetch one extra row to detect a next page.
    #[must_use]
    pub fn overfetch_limit(self) -> i64 {
        i64::from(self.0) + 1
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for PageSize {
    type Error = PageSizeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for u32 {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

/// Position and size of a requested page.
///
/// `after` is the cursor returned with the previous page, or `None` for the
/// first page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest<C> {
    after: Option<C>,
    size: PageSize,
}

impl<C> PageRequest<C> {
    /// Request the page following `after`.
    #[must_use]
    pub const fn new(after: Option<C>, size: PageSize) -> Self {
        Self { after, size }
    }

    /// Request the first page.
    #[must_use]
    pub const fn first(size: PageSize) -> Self {
        Self::new(None, size)
    }

    /// Cursor to continue from, if any.
    #[must_use]
    pub const fn after(&self) -> Option<&C> {
        self.after.as_ref()
    }

    /// Requested page size.
    #[must_use]
    pub const fn size(&self) -> PageSize {
        self.size
    }
}

/// One page of items plus the cursor for the following page.
///
/// `next` is `None` exactly when the producer believes this is the last page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T, C> {
    items: Vec<T>,
    next: Option<C>,
}

impl<T, C> Page<T, C> {
    /// Assemble a page from its parts.
    #[must_use]
    pub const fn new(items: Vec<T>, next: Option<C>) -> Self {
        Self { items, next }
    }

    /// A final page with no items.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(Vec::new(), None)
    }

    /// Build a page from a query that fetched up to `page_size + 1` rows.
    ///
    /// When the extra row is present it is dropped and the cursor is taken
    /// from the last row kept, so a strictly-greater-than continuation
    /// resumes exactly at the dropped row. Without the extra row the page
    /// is final.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{Page, PageSize};
    ///
    /// let size = PageSize::new(2).expect("valid size");
    /// let page = Page::from_overfetch(vec![1, 2, 3], size, |n| *n);
    /// assert_eq!(page.items(), &[1, 2]);
    /// assert_eq!(page.next(), Some(&2));
    ///
    /// let last = Page::from_overfetch(vec![3], size, |n| *n);
    /// assert!(last.is_last());
    /// ```
    pub fn from_overfetch(
        mut rows: Vec<T>,
        page_size: PageSize,
        cursor_of: impl FnOnce(&T) -> C,
    ) -> Self {
        let limit = page_size.as_usize();
        if rows.len() <= limit {
            return Self::new(rows, None);
        }
        rows.truncate(limit);
        let next = rows.last().map(cursor_of);
        Self::new(rows, next)
    }

    /// Build a page from a query capped at exactly `page_size` rows.
    ///
    /// A full page is assumed to have more data behind it, so the cursor is
    /// emitted for the last row. When the data ends on a page boundary the
    /// next request simply returns an empty final page.
    pub fn from_full_page(
        rows: Vec<T>,
        page_size: PageSize,
        cursor_of: impl FnOnce(&T) -> C,
    ) -> Self {
        let next = if rows.len() == page_size.as_usize() {
            rows.last().map(cursor_of)
        } else {
            None
        };
        Self::new(rows, next)
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Cursor for the following page, if any.
    #[must_use]
    pub const fn next(&self) -> Option<&C> {
        self.next.as_ref()
    }

    /// Whether this is the final page.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.next.is_none()
    }

    /// Split the page into items and cursor.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Option<C>) {
        (self.items, self.next)
    }
}
