//! Offset pagination definitions.

use common::pagination;
use derive_more::From;
use juniper::graphql_object;

use crate::Context;

/// Number of the page selected by default.
pub(crate) const DEFAULT_PAGE: i32 = pagination::DEFAULT_PAGE;

/// Size of the page selected by default.
pub(crate) const DEFAULT_PAGE_SIZE: i32 = pagination::DEFAULT_PAGE_SIZE;

/// Creates new [`pagination::Arguments`] out of the client-provided `page`
/// and `page_size`.
///
/// `null`s are replaced with the defaults, same as non-positive values.
pub(crate) fn arguments(
    page: Option<i32>,
    page_size: Option<i32>,
) -> pagination::Arguments {
    pagination::Arguments::new(page, page_size)
}

/// Information about a page of a list.
#[derive(Clone, Debug, From)]
pub struct PageInfo(pagination::PageInfo);

/// Information about a page of a list.
#[graphql_object(context = Context)]
impl PageInfo {
    /// Indicator whether there is a next page.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.0.has_next_page
    }

    /// Indicator whether there is a previous page.
    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.0.has_previous_page
    }

    /// ID of the first node on the page.
    #[must_use]
    pub fn start_cursor(&self) -> Option<&str> {
        self.0.start_cursor.as_deref()
    }

    /// ID of the last node on the page.
    #[must_use]
    pub fn end_cursor(&self) -> Option<&str> {
        self.0.end_cursor.as_deref()
    }

    /// Total number of nodes across all pages.
    #[must_use]
    pub fn total_count(&self) -> i32 {
        self.0.total_count
    }

    /// Total number of pages.
    #[must_use]
    pub fn total_pages(&self) -> i32 {
        self.0.total_pages
    }

    /// Number of this page, starting from `1`.
    #[must_use]
    pub fn current_page(&self) -> i32 {
        self.0.current_page
    }

    /// Requested size of this page.
    #[must_use]
    pub fn page_size(&self) -> i32 {
        self.0.page_size
    }
}

/// Defines a GraphQL connection of a list page.
#[macro_export]
macro_rules! define_connection {
    (
        #[doc = $doc:literal]
        #[graphql(name = $gql:literal)]
        struct $name:ident($page:ty => $node:ty);
    ) => {
        #[doc = $doc]
        #[derive(Clone, Debug, ::derive_more::From)]
        pub struct $name($page);

        #[doc = $doc]
        #[::juniper::graphql_object(name = $gql, context = $crate::Context)]
        impl $name {
            /// Nodes on this page.
            #[must_use]
            pub fn nodes(&self) -> ::std::vec::Vec<$node> {
                self.0.nodes.iter().cloned().map(<$node>::from).collect()
            }

            /// Information about this page.
            #[must_use]
            pub fn page_info(&self) -> $crate::api::PageInfo {
                self.0.info.clone().into()
            }
        }
    };
}

#[cfg(test)]
mod spec {
    use common::pagination::{self, Node, Page, TotalCount};

    use super::{arguments, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

    #[derive(Clone, Copy, Debug)]
    struct Row(i32);

    impl Node for Row {
        type Cursor = i32;

        fn cursor(&self) -> i32 {
            self.0
        }
    }

    #[test]
    fn substitutes_non_positive_arguments() {
        assert_eq!(
            arguments(Some(0), Some(-5)),
            pagination::Arguments {
                page: DEFAULT_PAGE,
                page_size: DEFAULT_PAGE_SIZE,
            },
        );
        assert_eq!(arguments(Some(2), Some(25)).offset().skip, 25);
    }

    #[test]
    fn substitutes_null_arguments() {
        assert_eq!(
            arguments(None, None),
            pagination::Arguments {
                page: DEFAULT_PAGE,
                page_size: DEFAULT_PAGE_SIZE,
            },
        );
        assert_eq!(
            arguments(Some(3), None),
            pagination::Arguments {
                page: 3,
                page_size: DEFAULT_PAGE_SIZE,
            },
        );
    }

    #[test]
    fn renders_cursors_as_ids() {
        let page = Page::new(
            vec![Row(5), Row(6), Row(7)],
            TotalCount(3),
            arguments(None, None),
        );
        let info = super::PageInfo::from(page.info);

        assert_eq!(info.start_cursor(), Some("5"));
        assert_eq!(info.end_cursor(), Some("7"));
        assert_eq!(info.total_pages(), 1);
        assert!(!info.has_next_page());
        assert!(!info.has_previous_page());
    }
}
