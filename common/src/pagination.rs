//! Abstractions for offset pagination.

use std::fmt;

/// Number of the [`Page`] selected when none is requested.
pub const DEFAULT_PAGE: i32 = 1;

/// Size of the [`Page`] selected when none is requested.
pub const DEFAULT_PAGE_SIZE: i32 = 10;

/// Pagination arguments.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Arguments {
    /// Number of the requested [`Page`], starting from `1`.
    pub page: i32,

    /// Maximum number of nodes on the requested [`Page`].
    pub page_size: i32,
}

impl Arguments {
    /// Creates new [`Arguments`] out of the client-provided values.
    ///
    /// Absent or non-positive values are replaced with [`DEFAULT_PAGE`] and
    /// [`DEFAULT_PAGE_SIZE`] respectively.
    #[must_use]
    pub fn new(page: Option<i32>, page_size: Option<i32>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE),
            page_size: page_size
                .filter(|s| *s > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Returns the [`Offset`] of rows requested by these [`Arguments`].
    #[must_use]
    pub fn offset(&self) -> Offset {
        offset(self.page, self.page_size)
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Window of rows to be fetched for a [`Page`].
///
/// Maps to an `OFFSET skip LIMIT take` SQL clause.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Offset {
    /// Number of rows to skip.
    pub skip: i64,

    /// Number of rows to take.
    pub take: i64,
}

/// Computes the [`Offset`] of the `page` with the provided `page_size`.
///
/// `page` lower than `1` is treated as `1`. Negative `page_size` is treated
/// as `0`.
#[must_use]
pub fn offset(page: i32, page_size: i32) -> Offset {
    let page = i64::from(page.max(1));
    let take = i64::from(page_size.max(0));
    Offset {
        skip: (page - 1) * take,
        take,
    }
}

/// Node of a [`Page`] exposing a unique key.
pub trait Node {
    /// Unique key of this [`Node`] rendered as its cursor.
    type Cursor: fmt::Display;

    /// Returns the unique key of this [`Node`].
    fn cursor(&self) -> Self::Cursor;
}

/// Total number of nodes matching a [`Selector`] across all its [`Page`]s.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TotalCount(pub i32);

impl From<i32> for TotalCount {
    fn from(count: i32) -> Self {
        Self(count)
    }
}

impl From<TotalCount> for i32 {
    fn from(count: TotalCount) -> Self {
        count.0
    }
}

/// A page of nodes along with its [`PageInfo`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page<N> {
    /// Nodes on this [`Page`], in the order they were fetched.
    pub nodes: Vec<N>,

    /// [`PageInfo`] of this [`Page`].
    pub info: PageInfo,
}

impl<N: Node> Page<N> {
    /// Assembles a new [`Page`] out of the fetched `nodes`, using
    /// [`Node::cursor()`] for its cursors.
    #[must_use]
    pub fn new(
        nodes: Vec<N>,
        total_count: TotalCount,
        arguments: Arguments,
    ) -> Self {
        Self::with_cursor(nodes, total_count, arguments, Node::cursor)
    }
}

impl<N> Page<N> {
    /// Assembles a new [`Page`] out of the fetched `nodes`, using the
    /// provided `cursor` accessor for its cursors.
    ///
    /// `nodes` must be the rows selected by the [`Offset`] of the provided
    /// [`Arguments`], and `total_count` must be counted with the same filter.
    #[must_use]
    pub fn with_cursor<C, F>(
        nodes: Vec<N>,
        total_count: TotalCount,
        arguments: Arguments,
        cursor: F,
    ) -> Self
    where
        C: fmt::Display,
        F: Fn(&N) -> C,
    {
        let Arguments { page, page_size } = arguments;
        let current_page = page.max(1);
        let total_count = total_count.0.max(0);
        let total_pages = total_pages(total_count, page_size);

        let info = PageInfo {
            has_next_page: current_page < total_pages,
            has_previous_page: current_page > 1,
            start_cursor: nodes.first().map(|n| cursor(n).to_string()),
            end_cursor: nodes.last().map(|n| cursor(n).to_string()),
            total_count,
            total_pages,
            current_page,
            page_size,
        };
        Self { nodes, info }
    }

    /// Maps nodes of this [`Page`] with the provided function, preserving its
    /// [`PageInfo`].
    #[must_use]
    pub fn map<T>(self, f: impl FnMut(N) -> T) -> Page<T> {
        Page {
            nodes: self.nodes.into_iter().map(f).collect(),
            info: self.info,
        }
    }
}

/// Computes the number of pages of `page_size` covering `total_count` nodes.
fn total_pages(total_count: i32, page_size: i32) -> i32 {
    if page_size <= 0 {
        return 0;
    }
    let total = i64::from(total_count.max(0));
    let size = i64::from(page_size);
    // Never exceeds `total_count`, so always fits.
    i32::try_from((total + size - 1) / size).unwrap_or(i32::MAX)
}

/// Information about a [`Page`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PageInfo {
    /// Indicator whether a [`Page`] after this one exists.
    pub has_next_page: bool,

    /// Indicator whether a [`Page`] before this one exists.
    pub has_previous_page: bool,

    /// Cursor of the first node on the [`Page`], if any.
    pub start_cursor: Option<String>,

    /// Cursor of the last node on the [`Page`], if any.
    pub end_cursor: Option<String>,

    /// Total number of nodes across all pages.
    pub total_count: i32,

    /// Total number of pages.
    pub total_pages: i32,

    /// Number of the [`Page`].
    pub current_page: i32,

    /// Requested size of the [`Page`].
    pub page_size: i32,
}

/// Pagination selector.
#[derive(Clone, Copy, Debug, Default)]
pub struct Selector<F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Filter narrowing down the paginated nodes.
    pub filter: F,
}

/// Defines pagination types of a list.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty, $filter:ty) => {
        #[doc = "A [`Page`] of the list nodes."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "An information about a [`Page`]."]
        pub type PageInfo = $crate::pagination::PageInfo;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$filter>;

        #[doc = "Total count of the list nodes matching a filter."]
        pub type TotalCount = $crate::pagination::TotalCount;
    };
}
