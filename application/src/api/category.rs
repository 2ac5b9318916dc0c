//! [`Category`]-related definitions.

use common::Handler as _;
use derive_more::From;
use juniper::{graphql_object, ID};
use marketplace::{domain, query, read};

use crate::{api, AsError, Context, Error};

/// A top-level category of the service catalog.
#[derive(Clone, Debug, From)]
pub struct Category(domain::Category);

/// A top-level category of the service catalog.
#[graphql_object(name = "ServiceCategory", context = Context)]
impl Category {
    /// Unique identifier of this `ServiceCategory`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ServiceCategory.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> ID {
        ID::from(self.0.id.to_string())
    }

    /// Name of this `ServiceCategory`.
    pub fn category(&self) -> &str {
        self.0.name.as_ref()
    }

    /// All `ServiceSubCategory`s of this `ServiceCategory`, ordered by their
    /// names.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ServiceCategory.subcategories",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn subcategories(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Subcategory>, Error> {
        ctx.marketplace()
            .execute(query::subcategory::ByCategory::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|s| s.into_iter().map(Into::into).collect())
    }

    /// `Service`s listed under any `ServiceSubCategory` of this
    /// `ServiceCategory`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ServiceCategory.services",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn services(
        &self,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE))]
        page: Option<i32>,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE_SIZE))]
        page_size: Option<i32>,
        is_active: Option<bool>,
        ctx: &Context,
    ) -> Result<api::service::list::Connection, Error> {
        api::service::list::select(
            read::service::list::Filter {
                category_id: Some(self.0.id),
                is_active,
                ..read::service::list::Filter::default()
            },
            page,
            page_size,
            ctx,
        )
        .await
    }
}
