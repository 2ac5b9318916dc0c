//! [`Review`]-related definitions.

use common::{DateTime, Handler as _};
use derive_more::From;
use juniper::{graphql_object, GraphQLInputObject, ID};
use marketplace::{command, domain, query};

use crate::{api, AsError, Context, Error};

/// A review of a `Service` left by a `Seller`.
#[derive(Clone, Debug, From)]
pub struct Review(domain::Review);

/// A review of a `Service` left by a `Seller`.
#[graphql_object(name = "ServiceReview", context = Context)]
impl Review {
    /// Unique identifier of this `ServiceReview`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ServiceReview.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> ID {
        ID::from(self.0.id.to_string())
    }

    /// ID of the reviewed `Service`.
    pub fn service_id(&self) -> i32 {
        self.0.service_id.into()
    }

    /// ID of the `Seller` who left this `ServiceReview`.
    pub fn reviewer_id(&self) -> &str {
        self.0.reviewer_id.as_ref()
    }

    /// Rating from `1` to `5`.
    pub fn rating(&self) -> i32 {
        self.0.rating.into()
    }

    /// Comment of the reviewer.
    pub fn comment(&self) -> Option<&str> {
        self.0.comment.as_ref().map(AsRef::as_ref)
    }

    /// `DateTime` when this `ServiceReview` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// Reviewed `Service`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ServiceReview.service",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn service(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Service>, Error> {
        ctx.marketplace()
            .execute(query::service::ById::by(self.0.service_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|s| s.map(Into::into))
    }

    /// `Seller` who left this `ServiceReview`.
    pub fn reviewer(&self) -> Option<api::Seller> {
        Some(self.0.reviewer_id.clone().into())
    }
}

/// Input for leaving a new `ServiceReview`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "AddServiceReviewInput")]
pub struct AddInput {
    /// ID of the reviewed `Service`.
    pub service_id: i32,

    /// ID of the `Seller` leaving the `ServiceReview`.
    pub reviewer_id: String,

    /// Rating from `1` to `5`.
    pub rating: i32,

    /// Comment of the reviewer.
    pub comment: Option<String>,
}

impl TryFrom<AddInput> for command::CreateReview {
    type Error = Error;

    fn try_from(input: AddInput) -> Result<Self, Self::Error> {
        let AddInput {
            service_id,
            reviewer_id,
            rating,
            comment,
        } = input;

        Ok(Self {
            service_id: service_id.into(),
            reviewer_id: api::parse("reviewerId", reviewer_id)?,
            rating: domain::review::Rating::new(rating)
                .ok_or_else(|| api::invalid("rating"))?,
            comment: comment.map(|c| api::parse("comment", c)).transpose()?,
        })
    }
}

pub mod list {
    //! Definitions related to the [`Review`] list.

    use common::Handler as _;
    use marketplace::{query, read};

    use super::Review;
    use crate::{api, define_connection, AsError, Context, Error};

    define_connection! {
        #[doc = "A page of `ServiceReview`s."]
        #[graphql(name = "ServiceReviewConnection")]
        struct Connection(read::review::list::Page => Review);
    }

    /// Selects a page of [`Review`]s matching the provided `filter`, newest
    /// first.
    ///
    /// # Errors
    ///
    /// If the [`Marketplace`] fails to select the page.
    ///
    /// [`Marketplace`]: crate::Marketplace
    pub(crate) async fn select(
        filter: read::review::list::Filter,
        page: Option<i32>,
        page_size: Option<i32>,
        ctx: &Context,
    ) -> Result<Connection, Error> {
        ctx.marketplace()
            .execute(query::review::List::by(read::review::list::Selector {
                arguments: api::pagination::arguments(page, page_size),
                filter,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}
