//! [`Review`]-related read definitions.

#[cfg(doc)]
use crate::domain::Review;

pub mod list {
    //! [`Review`] list definitions.

    use common::{define_pagination, pagination};

    use crate::domain::{review, seller, service, Review};

    define_pagination!(Review, Filter);

    impl pagination::Node for Review {
        type Cursor = review::Id;

        fn cursor(&self) -> Self::Cursor {
            self.id
        }
    }

    /// Filter for [`Selector`].
    ///
    /// Absent fields don't narrow down the list.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// ID of the reviewed [`Service`].
        ///
        /// [`Service`]: crate::domain::Service
        pub service_id: Option<service::Id>,

        /// ID of the seller who left a [`Review`].
        pub reviewer_id: Option<seller::Id>,
    }
}
