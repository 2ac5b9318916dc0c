//! [`Subcategory`]-related definitions.

use common::Handler as _;
use derive_more::From;
use juniper::{graphql_object, ID};
use marketplace::{domain, query, read};

use crate::{api, AsError, Context, Error};

/// A subcategory of a `ServiceCategory` which `Service`s are listed under.
#[derive(Clone, Debug, From)]
pub struct Subcategory(domain::Subcategory);

/// A subcategory of a `ServiceCategory` which `Service`s are listed under.
#[graphql_object(name = "ServiceSubCategory", context = Context)]
impl Subcategory {
    /// Unique identifier of this `ServiceSubCategory`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ServiceSubCategory.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> ID {
        ID::from(self.0.id.to_string())
    }

    /// Name of this `ServiceSubCategory`.
    pub fn sub_category(&self) -> &str {
        self.0.name.as_ref()
    }

    /// ID of the `ServiceCategory` this `ServiceSubCategory` belongs to.
    pub fn service_category_id(&self) -> i32 {
        self.0.category_id.into()
    }

    /// `ServiceCategory` this `ServiceSubCategory` belongs to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ServiceSubCategory.serviceCategory",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn service_category(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Category>, Error> {
        ctx.marketplace()
            .execute(query::category::ById::by(self.0.category_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|c| c.map(Into::into))
    }

    /// `Service`s listed under this `ServiceSubCategory`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ServiceSubCategory.services",
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
                subcategory_id: Some(self.0.id),
                is_active,
                ..read::service::list::Filter::default()
            },
            page,
            page_size,
            ctx,
        )
        .await
    }

    /// Number of `Service`s listed under this `ServiceSubCategory`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ServiceSubCategory.serviceCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn service_count(
        &self,
        ctx: &Context,
    ) -> Result<Option<i32>, Error> {
        ctx.marketplace()
            .execute(query::subcategory::ServiceCount::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|read::subcategory::ServiceCount(count)| Some(count))
    }
}

pub mod list {
    //! Definitions related to the [`Subcategory`] list.

    use common::Handler as _;
    use marketplace::{domain::category, query, read};

    use super::Subcategory;
    use crate::{api, define_connection, AsError, Context, Error};

    define_connection! {
        #[doc = "A page of `ServiceSubCategory`s."]
        #[graphql(name = "ServiceSubCategoryConnection")]
        struct Connection(read::subcategory::list::Page => Subcategory);
    }

    /// Selects a page of [`Subcategory`]s of the [`Category`] with the
    /// provided `category_id`.
    ///
    /// # Errors
    ///
    /// If the [`Marketplace`] fails to select the page.
    ///
    /// [`Category`]: marketplace::domain::Category
    /// [`Marketplace`]: crate::Marketplace
    pub(crate) async fn select(
        category_id: category::Id,
        page: Option<i32>,
        page_size: Option<i32>,
        ctx: &Context,
    ) -> Result<Connection, Error> {
        ctx.marketplace()
            .execute(query::subcategory::List::by(
                read::subcategory::list::Selector {
                    arguments: api::pagination::arguments(page, page_size),
                    filter: read::subcategory::list::Filter { category_id },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}
