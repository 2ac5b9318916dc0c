//! [`Service`]-related read definitions.

#[cfg(doc)]
use crate::domain::{Review, Service};

/// Summary of the [`Review`]s left on a [`Service`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RatingSummary {
    /// Average rating of the [`Service`], or `0` if it has no [`Review`]s.
    pub average: f64,

    /// Number of [`Review`]s left on the [`Service`].
    pub count: i32,
}

pub mod list {
    //! [`Service`] list definitions.

    use common::{define_pagination, pagination};

    use crate::domain::{category, seller, service, subcategory, Service};

    define_pagination!(Service, Filter);

    impl pagination::Node for Service {
        type Cursor = service::Id;

        fn cursor(&self) -> Self::Cursor {
            self.id
        }
    }

    /// Filter for [`Selector`].
    ///
    /// Absent fields don't narrow down the list.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// ID of the seller offering a [`Service`].
        pub seller_id: Option<seller::Id>,

        /// ID of the [`Subcategory`] a [`Service`] is listed under.
        ///
        /// [`Subcategory`]: crate::domain::Subcategory
        pub subcategory_id: Option<subcategory::Id>,

        /// ID of the [`Category`] a [`Service`] is listed under.
        ///
        /// [`Category`]: crate::domain::Category
        pub category_id: Option<category::Id>,

        /// [`service::Pricing`] of a [`Service`].
        pub pricing: Option<service::Pricing>,

        /// Indicator whether a [`Service`] is active.
        pub is_active: Option<bool>,
    }
}
