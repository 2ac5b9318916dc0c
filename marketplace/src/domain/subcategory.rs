//! [`Subcategory`] definitions.

use common::define_text;
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

use crate::domain::category;
#[cfg(doc)]
use crate::domain::{Category, Service};

/// Subcategory of a [`Category`] which [`Service`]s are listed under.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Subcategory {
    /// ID of this [`Subcategory`].
    pub id: Id,

    /// [`Name`] of this [`Subcategory`].
    pub name: Name,

    /// ID of the [`Category`] this [`Subcategory`] belongs to.
    pub category_id: category::Id,
}

/// ID of a [`Subcategory`].
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(i32);

define_text! {
    #[doc = "Name of a [`Subcategory`]."]
    struct Name(max = 128);
}
