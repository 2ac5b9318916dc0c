//! [`Service`]-related definitions.

use common::{DateTime, Handler as _};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLInputObject, ID};
use marketplace::{command, domain, query, read};
use tokio::sync::OnceCell;

use crate::{api, AsError, Context, Error};

/// A service offered by a seller.
#[derive(Clone, Debug)]
pub struct Service {
    /// Underlying [`domain::Service`].
    service: domain::Service,

    /// Lazily loaded [`read::service::RatingSummary`] of this [`Service`].
    rating: OnceCell<read::service::RatingSummary>,
}

impl From<domain::Service> for Service {
    fn from(service: domain::Service) -> Self {
        Self {
            service,
            rating: OnceCell::new(),
        }
    }
}

impl Service {
    /// Returns the [`read::service::RatingSummary`] of this [`Service`].
    async fn rating(
        &self,
        ctx: &Context,
    ) -> Result<&read::service::RatingSummary, Error> {
        let id = self.service.id;
        self.rating
            .get_or_try_init(|| {
                ctx.marketplace()
                    .execute(query::service::RatingSummary::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
            })
            .await
    }
}

/// A service offered by a seller.
#[graphql_object(context = Context)]
impl Service {
    /// Unique identifier of this `Service`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Service.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> ID {
        ID::from(self.service.id.to_string())
    }

    /// Name of this `Service`.
    pub fn name(&self) -> &str {
        self.service.name.as_ref()
    }

    /// Description of this `Service`.
    pub fn description(&self) -> Option<&str> {
        self.service.description.as_ref().map(AsRef::as_ref)
    }

    /// ID of the `Seller` offering this `Service`.
    pub fn seller_id(&self) -> &str {
        self.service.seller_id.as_ref()
    }

    /// ID of the `ServiceSubCategory` this `Service` is listed under.
    pub fn subcategory_id(&self) -> i32 {
        self.service.subcategory_id.into()
    }

    /// Pricing model of this `Service`.
    pub fn pricing_type(&self) -> Pricing {
        self.service.pricing.into()
    }

    /// Base price of this `Service`.
    pub fn base_price(&self) -> Option<f64> {
        self.service.base_price.map(domain::service::Price::to_f64)
    }

    /// Human-readable price range of this `Service`.
    pub fn price_range(&self) -> Option<&str> {
        self.service.price_range.as_ref().map(AsRef::as_ref)
    }

    /// Usual duration of this `Service` in minutes.
    pub fn duration(&self) -> Option<i32> {
        self.service.duration.map(Into::into)
    }

    /// Indicator whether this `Service` is offered at the moment.
    pub fn is_active(&self) -> bool {
        self.service.is_active
    }

    /// URLs of this `Service` images.
    pub fn images(&self) -> Vec<String> {
        self.service.images.iter().map(ToString::to_string).collect()
    }

    /// Tags of this `Service`.
    pub fn tags(&self) -> Vec<String> {
        self.service.tags.iter().map(ToString::to_string).collect()
    }

    /// `DateTime` when this `Service` was created.
    pub fn created_at(&self) -> DateTime {
        self.service.created_at.coerce()
    }

    /// `DateTime` when this `Service` was modified last time.
    pub fn updated_at(&self) -> DateTime {
        self.service.updated_at.coerce()
    }

    /// `ServiceSubCategory` this `Service` is listed under.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Service.serviceCategory",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn service_category(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Subcategory>, Error> {
        ctx.marketplace()
            .execute(query::subcategory::ById::by(self.service.subcategory_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|s| s.map(Into::into))
    }

    /// `Seller` offering this `Service`.
    pub fn seller(&self) -> Option<api::Seller> {
        Some(self.service.seller_id.clone().into())
    }

    /// `Quotation`s requested for this `Service`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Service.quotations",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn quotations(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Quotation>, Error> {
        ctx.marketplace()
            .execute(query::quotation::ByService::by(self.service.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|q| q.into_iter().map(Into::into).collect())
    }

    /// `ServiceReview`s left on this `Service`, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Service.reviews",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn reviews(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Review>, Error> {
        ctx.marketplace()
            .execute(query::review::ByService::by(self.service.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|r| r.into_iter().map(Into::into).collect())
    }

    /// Average rating of this `Service`, or `0` if it has no reviews.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Service.averageRating",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn average_rating(
        &self,
        ctx: &Context,
    ) -> Result<Option<f64>, Error> {
        Ok(Some(self.rating(ctx).await?.average))
    }

    /// Number of `ServiceReview`s left on this `Service`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Service.reviewCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn review_count(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.rating(ctx).await?.count)
    }
}

/// Pricing model of a `Service`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "ServicePricing")]
pub enum Pricing {
    /// Fixed price for the whole `Service`.
    Fixed,

    /// Price is negotiated through a `Quotation`.
    Quotation,

    /// Price per hour.
    Hourly,

    /// Price for a package of work.
    Package,
}

impl From<domain::service::Pricing> for Pricing {
    fn from(pricing: domain::service::Pricing) -> Self {
        use domain::service::Pricing as P;
        match pricing {
            P::Fixed => Self::Fixed,
            P::Quotation => Self::Quotation,
            P::Hourly => Self::Hourly,
            P::Package => Self::Package,
        }
    }
}

impl From<Pricing> for domain::service::Pricing {
    fn from(pricing: Pricing) -> Self {
        match pricing {
            Pricing::Fixed => Self::Fixed,
            Pricing::Quotation => Self::Quotation,
            Pricing::Hourly => Self::Hourly,
            Pricing::Package => Self::Package,
        }
    }
}

/// Input for adding a new `Service`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "AddServiceInput")]
pub struct AddInput {
    /// Name of the `Service`.
    pub name: String,

    /// Description of the `Service`.
    pub description: Option<String>,

    /// ID of the `ServiceSubCategory` to list the `Service` under.
    pub subcategory_id: i32,

    /// Pricing model of the `Service`.
    pub pricing_type: Pricing,

    /// Base price of the `Service`.
    pub base_price: Option<f64>,

    /// Human-readable price range of the `Service`.
    pub price_range: Option<String>,

    /// Usual duration of the `Service` in minutes.
    pub duration: Option<i32>,

    /// URLs of the `Service` images.
    pub images: Vec<String>,

    /// Tags of the `Service`.
    pub tags: Option<Vec<String>>,

    /// ID of the `Seller` offering the `Service`.
    pub seller_id: String,

    /// Indicator whether the `Service` is offered right away.
    ///
    /// `true` if not specified.
    pub is_active: Option<bool>,
}

impl TryFrom<AddInput> for command::CreateService {
    type Error = Error;

    fn try_from(input: AddInput) -> Result<Self, Self::Error> {
        let AddInput {
            name,
            description,
            subcategory_id,
            pricing_type,
            base_price,
            price_range,
            duration,
            images,
            tags,
            seller_id,
            is_active,
        } = input;

        Ok(Self {
            name: api::parse("name", name)?,
            description: description
                .map(|d| api::parse("description", d))
                .transpose()?,
            seller_id: api::parse("sellerId", seller_id)?,
            subcategory_id: subcategory_id.into(),
            pricing: pricing_type.into(),
            base_price: base_price.map(|p| price("basePrice", p)).transpose()?,
            price_range: price_range
                .map(|r| api::parse("priceRange", r))
                .transpose()?,
            duration: duration.map(|d| minutes("duration", d)).transpose()?,
            is_active,
            images: api::parse_all("images", images)?,
            tags: api::parse_all("tags", tags.unwrap_or_default())?,
        })
    }
}

/// Input for updating an existing `Service`.
///
/// Absent fields are left unchanged.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "UpdateServiceInput")]
pub struct UpdateInput {
    /// ID of the `Service` to update.
    pub id: ID,

    /// New name of the `Service`.
    pub name: Option<String>,

    /// New description of the `Service`.
    pub description: Option<String>,

    /// ID of the new `ServiceSubCategory` of the `Service`.
    pub subcategory_id: Option<i32>,

    /// New pricing model of the `Service`.
    pub pricing_type: Option<Pricing>,

    /// New base price of the `Service`.
    pub base_price: Option<f64>,

    /// New human-readable price range of the `Service`.
    pub price_range: Option<String>,

    /// New usual duration of the `Service` in minutes.
    pub duration: Option<i32>,

    /// New URLs of the `Service` images.
    pub images: Option<Vec<String>>,

    /// New tags of the `Service`.
    pub tags: Option<Vec<String>>,

    /// New activity of the `Service`.
    pub is_active: Option<bool>,
}

impl TryFrom<UpdateInput> for command::UpdateService {
    type Error = Error;

    fn try_from(input: UpdateInput) -> Result<Self, Self::Error> {
        let UpdateInput {
            id,
            name,
            description,
            subcategory_id,
            pricing_type,
            base_price,
            price_range,
            duration,
            images,
            tags,
            is_active,
        } = input;

        Ok(Self {
            id: api::parse_id(&id)?,
            name: name.map(|n| api::parse("name", n)).transpose()?,
            description: description
                .map(|d| api::parse("description", d))
                .transpose()?,
            subcategory_id: subcategory_id.map(Into::into),
            pricing: pricing_type.map(Into::into),
            base_price: base_price.map(|p| price("basePrice", p)).transpose()?,
            price_range: price_range
                .map(|r| api::parse("priceRange", r))
                .transpose()?,
            duration: duration.map(|d| minutes("duration", d)).transpose()?,
            is_active,
            images: images.map(|i| api::parse_all("images", i)).transpose()?,
            tags: tags.map(|t| api::parse_all("tags", t)).transpose()?,
        })
    }
}

/// Converts the provided `amount` of the input `field` into a
/// [`domain::service::Price`].
pub(crate) fn price(
    field: &str,
    amount: f64,
) -> Result<domain::service::Price, Error> {
    domain::service::Price::from_f64(amount).ok_or_else(|| api::invalid(field))
}

/// Converts the provided `minutes` of the input `field` into
/// [`domain::service::Minutes`].
pub(crate) fn minutes(
    field: &str,
    minutes: i32,
) -> Result<domain::service::Minutes, Error> {
    domain::service::Minutes::new(minutes).ok_or_else(|| api::invalid(field))
}

pub mod list {
    //! Definitions related to the [`Service`] list.

    use common::Handler as _;
    use marketplace::{query, read};

    use super::Service;
    use crate::{api, define_connection, AsError, Context, Error};

    define_connection! {
        #[doc = "A page of `Service`s."]
        #[graphql(name = "ServiceConnection")]
        struct Connection(read::service::list::Page => Service);
    }

    /// Selects a page of [`Service`]s matching the provided `filter`.
    ///
    /// # Errors
    ///
    /// If the [`Marketplace`] fails to select the page.
    ///
    /// [`Marketplace`]: crate::Marketplace
    pub(crate) async fn select(
        filter: read::service::list::Filter,
        page: Option<i32>,
        page_size: Option<i32>,
        ctx: &Context,
    ) -> Result<Connection, Error> {
        ctx.marketplace()
            .execute(query::service::List::by(read::service::list::Selector {
                arguments: api::pagination::arguments(page, page_size),
                filter,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}
