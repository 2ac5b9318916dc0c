//! GraphQL [`Query`]s definitions.

use common::Handler as _;
use juniper::{graphql_object, ID};
use marketplace::{domain, query, read};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the whole catalog of `ServiceCategory`s ordered by their
    /// names.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SERVICE_CATALOG_EMPTY` - there are no `ServiceCategory`s at all.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "serviceCatalog",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn service_catalog(
        ctx: &Context,
    ) -> Result<Option<Vec<api::Category>>, Error> {
        let catalog = ctx
            .marketplace()
            .execute(query::category::Catalog::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        if catalog.is_empty() {
            return Err(CategoryError::CatalogEmpty.into())
                .map_err(ctx.error());
        }
        Ok(Some(catalog.into_iter().map(Into::into).collect()))
    }

    /// Returns the `ServiceCategory` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `ServiceCategory` ID;
    /// - `SERVICE_CATEGORY_NOT_EXISTS` - the `ServiceCategory` with the
    ///                                   specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = ?id,
            gql.name = "getServiceCategory",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn get_service_category(
        id: ID,
        ctx: &Context,
    ) -> Result<Option<api::Category>, Error> {
        let id = api::parse_id::<domain::category::Id>(&id)
            .map_err(ctx.error())?;
        ctx.marketplace()
            .execute(query::category::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| CategoryError::NotExists.into())
            .map_err(ctx.error())
            .map(|c| Some(c.into()))
    }

    /// Fetches the page of `ServiceSubCategory`s of the specified
    /// `ServiceCategory`, ordered by their names.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `ServiceCategory` ID.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "getServiceSubCategories",
            otel.name = Self::SPAN_NAME,
            page = ?page,
            page_size = ?page_size,
            service_category_id = ?service_category_id,
        ),
    )]
    pub async fn get_service_sub_categories(
        service_category_id: ID,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE))]
        page: Option<i32>,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE_SIZE))]
        page_size: Option<i32>,
        ctx: &Context,
    ) -> Result<Option<api::subcategory::list::Connection>, Error> {
        let category_id = api::parse_id(&service_category_id)
            .map_err(ctx.error())?;
        api::subcategory::list::select(category_id, page, page_size, ctx)
            .await
            .map(Some)
    }

    /// Returns the `ServiceSubCategory` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `ServiceSubCategory` ID;
    /// - `SERVICE_SUBCATEGORY_NOT_EXISTS` - the `ServiceSubCategory` with
    ///                                      the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = ?id,
            gql.name = "getServiceSubCategory",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn get_service_sub_category(
        id: ID,
        ctx: &Context,
    ) -> Result<Option<api::Subcategory>, Error> {
        let id = api::parse_id::<domain::subcategory::Id>(&id)
            .map_err(ctx.error())?;
        ctx.marketplace()
            .execute(query::subcategory::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| SubcategoryError::NotExists.into())
            .map_err(ctx.error())
            .map(|s| Some(s.into()))
    }

    /// Returns the `Service` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `Service` ID;
    /// - `SERVICE_NOT_EXISTS` - the `Service` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = ?id,
            gql.name = "getService",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn get_service(
        id: ID,
        ctx: &Context,
    ) -> Result<Option<api::Service>, Error> {
        let id =
            api::parse_id::<domain::service::Id>(&id).map_err(ctx.error())?;
        ctx.marketplace()
            .execute(query::service::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ServiceError::NotExists.into())
            .map_err(ctx.error())
            .map(|s| Some(s.into()))
    }

    /// Fetches the page of all `Service`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "getServices",
            is_active = ?is_active,
            otel.name = Self::SPAN_NAME,
            page = ?page,
            page_size = ?page_size,
        ),
    )]
    pub async fn get_services(
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE))]
        page: Option<i32>,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE_SIZE))]
        page_size: Option<i32>,
        is_active: Option<bool>,
        ctx: &Context,
    ) -> Result<Option<api::service::list::Connection>, Error> {
        api::service::list::select(
            read::service::list::Filter {
                is_active,
                ..read::service::list::Filter::default()
            },
            page,
            page_size,
            ctx,
        )
        .await
        .map(Some)
    }

    /// Fetches the page of `Service`s offered by the specified `Seller`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `Seller` ID.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "getServicesBySeller",
            is_active = ?is_active,
            otel.name = Self::SPAN_NAME,
            page = ?page,
            page_size = ?page_size,
            seller_id = ?seller_id,
        ),
    )]
    pub async fn get_services_by_seller(
        seller_id: ID,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE))]
        page: Option<i32>,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE_SIZE))]
        page_size: Option<i32>,
        is_active: Option<bool>,
        ctx: &Context,
    ) -> Result<Option<api::service::list::Connection>, Error> {
        let seller_id = api::parse_id(&seller_id).map_err(ctx.error())?;
        api::service::list::select(
            read::service::list::Filter {
                seller_id: Some(seller_id),
                is_active,
                ..read::service::list::Filter::default()
            },
            page,
            page_size,
            ctx,
        )
        .await
        .map(Some)
    }

    /// Fetches the page of `Service`s listed under the specified
    /// `ServiceSubCategory`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `ServiceSubCategory` ID.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "getServicesBySubCategory",
            is_active = ?is_active,
            otel.name = Self::SPAN_NAME,
            page = ?page,
            page_size = ?page_size,
            subcategory_id = ?subcategory_id,
        ),
    )]
    pub async fn get_services_by_sub_category(
        subcategory_id: ID,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE))]
        page: Option<i32>,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE_SIZE))]
        page_size: Option<i32>,
        is_active: Option<bool>,
        ctx: &Context,
    ) -> Result<Option<api::service::list::Connection>, Error> {
        let subcategory_id =
            api::parse_id(&subcategory_id).map_err(ctx.error())?;
        api::service::list::select(
            read::service::list::Filter {
                subcategory_id: Some(subcategory_id),
                is_active,
                ..read::service::list::Filter::default()
            },
            page,
            page_size,
            ctx,
        )
        .await
        .map(Some)
    }

    /// Fetches the page of `Service`s with the specified `ServicePricing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "getServicesByPricingType",
            is_active = ?is_active,
            otel.name = Self::SPAN_NAME,
            page = ?page,
            page_size = ?page_size,
            pricing_type = ?pricing_type,
        ),
    )]
    pub async fn get_services_by_pricing_type(
        pricing_type: api::service::Pricing,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE))]
        page: Option<i32>,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE_SIZE))]
        page_size: Option<i32>,
        is_active: Option<bool>,
        ctx: &Context,
    ) -> Result<Option<api::service::list::Connection>, Error> {
        api::service::list::select(
            read::service::list::Filter {
                pricing: Some(pricing_type.into()),
                is_active,
                ..read::service::list::Filter::default()
            },
            page,
            page_size,
            ctx,
        )
        .await
        .map(Some)
    }

    /// Returns the `Quotation` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `Quotation` ID;
    /// - `QUOTATION_NOT_EXISTS` - the `Quotation` with the specified ID does
    ///                            not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = ?id,
            gql.name = "getQuotation",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn get_quotation(
        id: ID,
        ctx: &Context,
    ) -> Result<Option<api::Quotation>, Error> {
        let id = api::parse_id::<domain::quotation::Id>(&id)
            .map_err(ctx.error())?;
        ctx.marketplace()
            .execute(query::quotation::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| QuotationError::NotExists.into())
            .map_err(ctx.error())
            .map(|q| Some(q.into()))
    }

    /// Fetches the page of `Quotation`s requested by the specified client.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `Seller` ID.
    #[tracing::instrument(
        skip_all,
        fields(
            client_id = ?client_id,
            gql.name = "getQuotationsByClient",
            otel.name = Self::SPAN_NAME,
            page = ?page,
            page_size = ?page_size,
        ),
    )]
    pub async fn get_quotations_by_client(
        client_id: ID,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE))]
        page: Option<i32>,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE_SIZE))]
        page_size: Option<i32>,
        ctx: &Context,
    ) -> Result<Option<api::quotation::list::Connection>, Error> {
        let client_id = api::parse_id(&client_id).map_err(ctx.error())?;
        api::quotation::list::select(
            read::quotation::list::Filter {
                client_id: Some(client_id),
                ..read::quotation::list::Filter::default()
            },
            page,
            page_size,
            ctx,
        )
        .await
        .map(Some)
    }

    /// Fetches the page of `Quotation`s addressed to the specified provider.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `Seller` ID.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "getQuotationsByProvider",
            otel.name = Self::SPAN_NAME,
            page = ?page,
            page_size = ?page_size,
            provider_id = ?provider_id,
        ),
    )]
    pub async fn get_quotations_by_provider(
        provider_id: ID,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE))]
        page: Option<i32>,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE_SIZE))]
        page_size: Option<i32>,
        ctx: &Context,
    ) -> Result<Option<api::quotation::list::Connection>, Error> {
        let provider_id = api::parse_id(&provider_id).map_err(ctx.error())?;
        api::quotation::list::select(
            read::quotation::list::Filter {
                provider_id: Some(provider_id),
                ..read::quotation::list::Filter::default()
            },
            page,
            page_size,
            ctx,
        )
        .await
        .map(Some)
    }

    /// Fetches the page of `Quotation`s requested for the specified
    /// `Service`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `Service` ID.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "getQuotationsByService",
            otel.name = Self::SPAN_NAME,
            page = ?page,
            page_size = ?page_size,
            service_id = ?service_id,
        ),
    )]
    pub async fn get_quotations_by_service(
        service_id: ID,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE))]
        page: Option<i32>,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE_SIZE))]
        page_size: Option<i32>,
        ctx: &Context,
    ) -> Result<Option<api::quotation::list::Connection>, Error> {
        let service_id = api::parse_id(&service_id).map_err(ctx.error())?;
        api::quotation::list::select(
            read::quotation::list::Filter {
                service_id: Some(service_id),
                ..read::quotation::list::Filter::default()
            },
            page,
            page_size,
            ctx,
        )
        .await
        .map(Some)
    }

    /// Fetches the page of `Quotation`s in the specified `QuotationStatus`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "getQuotationsByStatus",
            otel.name = Self::SPAN_NAME,
            page = ?page,
            page_size = ?page_size,
            status = ?status,
        ),
    )]
    pub async fn get_quotations_by_status(
        status: api::quotation::Status,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE))]
        page: Option<i32>,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE_SIZE))]
        page_size: Option<i32>,
        ctx: &Context,
    ) -> Result<Option<api::quotation::list::Connection>, Error> {
        api::quotation::list::select(
            read::quotation::list::Filter {
                status: Some(status.into()),
                ..read::quotation::list::Filter::default()
            },
            page,
            page_size,
            ctx,
        )
        .await
        .map(Some)
    }

    /// Fetches the page of `ServiceReview`s left on the specified `Service`,
    /// newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `Service` ID.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "getServiceReviews",
            otel.name = Self::SPAN_NAME,
            page = ?page,
            page_size = ?page_size,
            service_id = ?service_id,
        ),
    )]
    pub async fn get_service_reviews(
        service_id: ID,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE))]
        page: Option<i32>,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE_SIZE))]
        page_size: Option<i32>,
        ctx: &Context,
    ) -> Result<Option<api::review::list::Connection>, Error> {
        let service_id = api::parse_id(&service_id).map_err(ctx.error())?;
        api::review::list::select(
            read::review::list::Filter {
                service_id: Some(service_id),
                ..read::review::list::Filter::default()
            },
            page,
            page_size,
            ctx,
        )
        .await
        .map(Some)
    }

    /// Fetches the page of `ServiceReview`s left by the specified `Seller`,
    /// newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `Seller` ID.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "getServiceReviewsByReviewer",
            otel.name = Self::SPAN_NAME,
            page = ?page,
            page_size = ?page_size,
            reviewer_id = ?reviewer_id,
        ),
    )]
    pub async fn get_service_reviews_by_reviewer(
        reviewer_id: ID,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE))]
        page: Option<i32>,
        #[graphql(default = Some(api::pagination::DEFAULT_PAGE_SIZE))]
        page_size: Option<i32>,
        ctx: &Context,
    ) -> Result<Option<api::review::list::Connection>, Error> {
        let reviewer_id = api::parse_id(&reviewer_id).map_err(ctx.error())?;
        api::review::list::select(
            read::review::list::Filter {
                reviewer_id: Some(reviewer_id),
                ..read::review::list::Filter::default()
            },
            page,
            page_size,
            ctx,
        )
        .await
        .map(Some)
    }
}

define_error! {
    enum CategoryError {
        #[code = "SERVICE_CATEGORY_NOT_EXISTS"]
        #[kind = NotFound]
        #[message = "`ServiceCategory` with the specified ID does not exist"]
        NotExists,

        #[code = "SERVICE_CATALOG_EMPTY"]
        #[kind = NotFound]
        #[message = "There are no `ServiceCategory`s in the catalog"]
        CatalogEmpty,
    }
}

define_error! {
    enum QuotationError {
        #[code = "QUOTATION_NOT_EXISTS"]
        #[kind = NotFound]
        #[message = "`Quotation` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum ServiceError {
        #[code = "SERVICE_NOT_EXISTS"]
        #[kind = NotFound]
        #[message = "`Service` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum SubcategoryError {
        #[code = "SERVICE_SUBCATEGORY_NOT_EXISTS"]
        #[kind = NotFound]
        #[message = "`ServiceSubCategory` with the specified ID does not \
                     exist"]
        NotExists,
    }
}

#[cfg(test)]
mod spec {
    use crate::{error::Kind, Error};

    use super::{CategoryError, SubcategoryError};

    #[test]
    fn reports_missing_entities_as_not_found() {
        let err = Error::from(CategoryError::CatalogEmpty);
        assert_eq!(err.code, "SERVICE_CATALOG_EMPTY");
        assert_eq!(err.kind, Kind::NotFound);
        assert_eq!(err.kind.status_code(), http::StatusCode::NOT_FOUND);

        let err = Error::from(SubcategoryError::NotExists);
        assert_eq!(err.code, "SERVICE_SUBCATEGORY_NOT_EXISTS");
        assert_eq!(
            err.message,
            "`ServiceSubCategory` with the specified ID does not exist",
        );
    }
}
