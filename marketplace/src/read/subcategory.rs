//! [`Subcategory`]-related read definitions.

use derive_more::{Display, From, Into};

#[cfg(doc)]
use crate::domain::{Service, Subcategory};

/// Number of [`Service`]s listed under a [`Subcategory`].
#[derive(Clone, Copy, Debug, Default, Display, Eq, From, Into, PartialEq)]
pub struct ServiceCount(pub i32);

pub mod list {
    //! [`Subcategory`] list definitions.

    use common::{define_pagination, pagination};

    use crate::domain::{category, subcategory, Subcategory};

    define_pagination!(Subcategory, Filter);

    impl pagination::Node for Subcategory {
        type Cursor = subcategory::Id;

        fn cursor(&self) -> Self::Cursor {
            self.id
        }
    }

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug)]
    pub struct Filter {
        /// ID of the [`Category`] a [`Subcategory`] belongs to.
        ///
        /// [`Category`]: crate::domain::Category
        pub category_id: category::Id,
    }
}
