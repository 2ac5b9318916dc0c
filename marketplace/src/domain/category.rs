//! [`Category`] definitions.

use common::define_text;
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

/// Top-level category of the service catalog.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Category {
    /// ID of this [`Category`].
    pub id: Id,

    /// [`Name`] of this [`Category`].
    pub name: Name,
}

/// ID of a [`Category`].
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
    #[doc = "Name of a [`Category`]."]
    struct Name(max = 128);
}
