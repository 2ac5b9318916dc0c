//! [`Review`] definitions.

use common::{define_text, unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

#[cfg(doc)]
use common::DateTime;

use crate::domain::{seller, service};
#[cfg(doc)]
use crate::domain::Service;

/// Review of a [`Service`] left by a seller.
///
/// Each seller reviews a [`Service`] at most once.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Review {
    /// ID of this [`Review`].
    pub id: Id,

    /// ID of the reviewed [`Service`].
    pub service_id: service::Id,

    /// ID of the seller who left this [`Review`].
    pub reviewer_id: seller::Id,

    /// [`Rating`] given to the [`Service`].
    pub rating: Rating,

    /// [`Comment`] of the reviewer, if any.
    pub comment: Option<Comment>,

    /// [`DateTime`] when this [`Review`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Review`].
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

/// Rating of a [`Service`] from `1` to `5`.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Rating(i16);

impl Rating {
    /// Lowest possible [`Rating`].
    pub const MIN: Self = Self(1);

    /// Highest possible [`Rating`].
    pub const MAX: Self = Self(5);

    /// Creates a new [`Rating`] if the provided `rating` is within
    /// [`Rating::MIN`]..=[`Rating::MAX`].
    #[must_use]
    pub fn new(rating: i32) -> Option<Self> {
        let rating = i16::try_from(rating).ok()?;
        (Self::MIN.0..=Self::MAX.0)
            .contains(&rating)
            .then_some(Self(rating))
    }
}

impl From<Rating> for i32 {
    fn from(rating: Rating) -> Self {
        rating.0.into()
    }
}

define_text! {
    #[doc = "Comment of a [`Review`]."]
    struct Comment(max = 4096);
}

/// [`DateTime`] when a [`Review`] was created.
pub type CreationDateTime = DateTimeOf<(Review, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::Rating;

    #[test]
    fn rating_is_within_bounds() {
        for r in 1..=5 {
            assert_eq!(Rating::new(r).map(i32::from), Some(r));
        }
        for r in [i32::MIN, -1, 0, 6, 100_000, i32::MAX] {
            assert_eq!(Rating::new(r), None, "{r}");
        }
    }
}
