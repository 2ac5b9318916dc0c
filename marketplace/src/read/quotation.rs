//! [`Quotation`]-related read definitions.

use derive_more::{Display, From, Into};

#[cfg(doc)]
use crate::domain::Quotation;

/// Number of [`Quotation`]s expired at once.
#[derive(Clone, Copy, Debug, Default, Display, Eq, From, Into, PartialEq)]
pub struct Expired(pub u64);

pub mod list {
    //! [`Quotation`] list definitions.

    use common::{define_pagination, pagination};

    use crate::domain::{quotation, seller, service, Quotation};

    define_pagination!(Quotation, Filter);

    impl pagination::Node for Quotation {
        type Cursor = quotation::Id;

        fn cursor(&self) -> Self::Cursor {
            self.id
        }
    }

    /// Filter for [`Selector`].
    ///
    /// Absent fields don't narrow down the list.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// ID of the seller who requested a [`Quotation`].
        pub client_id: Option<seller::Id>,

        /// ID of the seller providing the quoted [`Service`].
        ///
        /// [`Service`]: crate::domain::Service
        pub provider_id: Option<seller::Id>,

        /// ID of the quoted [`Service`].
        ///
        /// [`Service`]: crate::domain::Service
        pub service_id: Option<service::Id>,

        /// [`quotation::Status`] of a [`Quotation`].
        pub status: Option<quotation::Status>,
    }
}
