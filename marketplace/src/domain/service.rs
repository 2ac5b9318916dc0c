//! [`Service`] definitions.

use common::{define_kind, define_text, unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::{prelude::ToPrimitive as _, Decimal};

#[cfg(doc)]
use common::DateTime;

use crate::domain::{seller, subcategory};
#[cfg(doc)]
use crate::domain::{Quotation, Subcategory};

/// Service offered by a seller.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Service {
    /// ID of this [`Service`].
    pub id: Id,

    /// [`Name`] of this [`Service`].
    pub name: Name,

    /// [`Description`] of this [`Service`], if any.
    pub description: Option<Description>,

    /// ID of the seller offering this [`Service`].
    pub seller_id: seller::Id,

    /// ID of the [`Subcategory`] this [`Service`] is listed under.
    pub subcategory_id: subcategory::Id,

    /// [`Pricing`] model of this [`Service`].
    pub pricing: Pricing,

    /// Base [`Price`] of this [`Service`], if any.
    pub base_price: Option<Price>,

    /// Human-readable [`PriceRange`] of this [`Service`], if any.
    pub price_range: Option<PriceRange>,

    /// Usual duration of this [`Service`], if known.
    pub duration: Option<Minutes>,

    /// Indicator whether this [`Service`] is offered at the moment.
    pub is_active: bool,

    /// [`Image`]s of this [`Service`].
    pub images: Vec<Image>,

    /// [`Tag`]s of this [`Service`].
    pub tags: Vec<Tag>,

    /// [`DateTime`] when this [`Service`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Service`] was modified last time.
    pub updated_at: ModificationDateTime,
}

/// ID of a [`Service`].
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
    #[doc = "Name of a [`Service`]."]
    struct Name(max = 256);
}

define_text! {
    #[doc = "Description of a [`Service`]."]
    struct Description(max = 4096);
}

define_text! {
    #[doc = "Human-readable price range of a [`Service`] (`$10-$20`, \
             for example)."]
    struct PriceRange(max = 128);
}

define_text! {
    #[doc = "URL of a [`Service`] image."]
    struct Image(max = 2048);
}

define_text! {
    #[doc = "Tag of a [`Service`]."]
    struct Tag(max = 64);
}

define_kind! {
    #[doc = "Pricing model of a [`Service`]."]
    enum Pricing {
        #[doc = "Fixed price for the whole [`Service`]."]
        Fixed = 1,

        #[doc = "Price is negotiated through a [`Quotation`]."]
        Quotation = 2,

        #[doc = "Price per hour."]
        Hourly = 3,

        #[doc = "Price for a package of work."]
        Package = 4,
    }
}

/// Non-negative price.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Price(Decimal);

impl Price {
    /// Creates a new [`Price`] if the provided `amount` isn't negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (!amount.is_sign_negative() || amount.is_zero()).then_some(Self(amount))
    }

    /// Creates a new [`Price`] out of the provided floating-point `amount`,
    /// rounded to cents.
    ///
    /// [`None`] is returned if the `amount` is negative or not finite.
    #[must_use]
    pub fn from_f64(amount: f64) -> Option<Self> {
        Decimal::from_f64_retain(amount)
            .map(|d| d.round_dp(2))
            .and_then(Self::new)
    }

    /// Returns the underlying [`Decimal`] amount of this [`Price`].
    #[must_use]
    pub fn amount(self) -> Decimal {
        self.0
    }

    /// Returns the floating-point approximation of this [`Price`].
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }
}

/// Positive duration in whole minutes.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Minutes(i32);

impl Minutes {
    /// Creates new [`Minutes`] if the provided `minutes` are positive.
    #[must_use]
    pub fn new(minutes: i32) -> Option<Self> {
        (minutes > 0).then_some(Self(minutes))
    }
}

/// [`DateTime`] when a [`Service`] was created.
pub type CreationDateTime = DateTimeOf<(Service, unit::Creation)>;

/// [`DateTime`] when a [`Service`] was modified.
pub type ModificationDateTime = DateTimeOf<(Service, unit::Modification)>;

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;
    use strum::IntoEnumIterator as _;

    use super::{Minutes, Price, Pricing};

    #[test]
    fn price_is_non_negative() {
        assert!(Price::new(Decimal::ZERO).is_some());
        assert!(Price::new(Decimal::new(1999, 2)).is_some());
        assert!(Price::new(Decimal::new(-1, 2)).is_none());
    }

    #[test]
    fn price_from_float_is_rounded() {
        let price = Price::from_f64(10.555).expect("valid price");
        assert_eq!(price.amount().scale(), 2);
        let price = Price::from_f64(19.99).expect("valid price");
        assert!((price.to_f64() - 19.99).abs() < 1e-9);
        assert!(Price::from_f64(-3.0).is_none());
        assert!(Price::from_f64(f64::NAN).is_none());
        assert!(Price::from_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn minutes_are_positive() {
        assert!(Minutes::new(30).is_some());
        assert!(Minutes::new(0).is_none());
        assert!(Minutes::new(-15).is_none());
    }

    #[test]
    fn pricing_round_trips_through_u8() {
        for pricing in Pricing::iter() {
            assert_eq!(Pricing::from_u8(pricing.u8()), Some(pricing));
        }
        assert_eq!(Pricing::from_u8(0), None);
        assert_eq!(Pricing::Quotation.to_string(), "QUOTATION");
    }
}
