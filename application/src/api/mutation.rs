//! GraphQL [`Mutation`]s definitions.

use common::Handler as _;
use juniper::{graphql_object, ID};
use marketplace::{
    command::{self, change_quotation_status::Transition},
    domain,
};

use crate::{api, define_error, AsError, Context, Error};

use super::query::{QuotationError, ServiceError, SubcategoryError};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Adds a new `Service` to the catalog.
    ///
    /// The `Service` is active unless specified otherwise.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_INPUT` - any of the provided values is malformed;
    /// - `SERVICE_SUBCATEGORY_NOT_EXISTS` - the specified
    ///                                      `ServiceSubCategory` does not
    ///                                      exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "addService",
            otel.name = Self::SPAN_NAME,
            seller_id = %input.seller_id,
            subcategory_id = input.subcategory_id,
        ),
    )]
    pub async fn add_service(
        input: api::service::AddInput,
        ctx: &Context,
    ) -> Result<Option<api::Service>, Error> {
        let cmd =
            command::CreateService::try_from(input).map_err(ctx.error())?;
        ctx.marketplace()
            .execute(cmd)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|s| Some(s.into()))
    }

    /// Updates the specified `Service`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `Service` ID;
    /// - `INVALID_INPUT` - any of the provided values is malformed;
    /// - `SERVICE_NOT_EXISTS` - the `Service` with the specified ID does not
    ///                          exist;
    /// - `SERVICE_SUBCATEGORY_NOT_EXISTS` - the specified
    ///                                      `ServiceSubCategory` does not
    ///                                      exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateService",
            id = ?input.id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_service(
        input: api::service::UpdateInput,
        ctx: &Context,
    ) -> Result<Option<api::Service>, Error> {
        let cmd =
            command::UpdateService::try_from(input).map_err(ctx.error())?;
        ctx.marketplace()
            .execute(cmd)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|s| Some(s.into()))
    }

    /// Deletes the specified `Service` along with its `Quotation`s and
    /// `ServiceReview`s.
    ///
    /// Returns the deleted `Service`.
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
            gql.name = "deleteService",
            id = ?id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_service(
        id: ID,
        ctx: &Context,
    ) -> Result<Option<api::Service>, Error> {
        let id = api::parse_id(&id).map_err(ctx.error())?;
        ctx.marketplace()
            .execute(command::DeleteService { id })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|s| Some(s.into()))
    }

    /// Flips the activity of the specified `Service`.
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
            gql.name = "toggleServiceActive",
            id = ?id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn toggle_service_active(
        id: ID,
        ctx: &Context,
    ) -> Result<Option<api::Service>, Error> {
        let id = api::parse_id(&id).map_err(ctx.error())?;
        ctx.marketplace()
            .execute(command::ToggleServiceActive { id })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|s| Some(s.into()))
    }

    /// Requests a new `PENDING` `Quotation` for a `Service`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_INPUT` - any of the provided values is malformed;
    /// - `SERVICE_NOT_EXISTS` - the quoted `Service` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "addQuotation",
            otel.name = Self::SPAN_NAME,
            service_id = input.service_id,
        ),
    )]
    pub async fn add_quotation(
        input: api::quotation::AddInput,
        ctx: &Context,
    ) -> Result<Option<api::Quotation>, Error> {
        let cmd =
            command::CreateQuotation::try_from(input).map_err(ctx.error())?;
        ctx.marketplace()
            .execute(cmd)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|q| Some(q.into()))
    }

    /// Updates the specified `Quotation`.
    ///
    /// The provided `QuotationStatus` is set as is, bypassing the lifecycle
    /// checks.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `Quotation` ID;
    /// - `INVALID_INPUT` - any of the provided values is malformed;
    /// - `QUOTATION_NOT_EXISTS` - the `Quotation` with the specified ID does
    ///                            not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateQuotation",
            id = ?input.id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_quotation(
        input: api::quotation::UpdateInput,
        ctx: &Context,
    ) -> Result<Option<api::Quotation>, Error> {
        let cmd =
            command::UpdateQuotation::try_from(input).map_err(ctx.error())?;
        ctx.marketplace()
            .execute(cmd)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|q| Some(q.into()))
    }

    /// Accepts the specified `PENDING` `Quotation`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `Quotation` ID;
    /// - `INVALID_QUOTATION_STATUS_TRANSITION` - the `Quotation` is not
    ///                                           `PENDING`;
    /// - `QUOTATION_NOT_EXISTS` - the `Quotation` with the specified ID does
    ///                            not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "acceptQuotation",
            id = ?id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn accept_quotation(
        id: ID,
        ctx: &Context,
    ) -> Result<Option<api::Quotation>, Error> {
        Self::change_status(&id, Transition::Accept, ctx).await
    }

    /// Declines the specified `PENDING` `Quotation`.
    ///
    /// The provided `reason` is stored into the provider notes.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `Quotation` ID;
    /// - `INVALID_INPUT` - the provided `reason` is malformed;
    /// - `INVALID_QUOTATION_STATUS_TRANSITION` - the `Quotation` is not
    ///                                           `PENDING`;
    /// - `QUOTATION_NOT_EXISTS` - the `Quotation` with the specified ID does
    ///                            not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "declineQuotation",
            id = ?id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn decline_quotation(
        id: ID,
        reason: Option<String>,
        ctx: &Context,
    ) -> Result<Option<api::Quotation>, Error> {
        let reason = reason
            .map(|r| api::parse("reason", r))
            .transpose()
            .map_err(ctx.error())?;
        Self::change_status(&id, Transition::Decline(reason), ctx).await
    }

    /// Completes the specified `ACCEPTED` `Quotation`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `Quotation` ID;
    /// - `INVALID_QUOTATION_STATUS_TRANSITION` - the `Quotation` is not
    ///                                           `ACCEPTED`;
    /// - `QUOTATION_NOT_EXISTS` - the `Quotation` with the specified ID does
    ///                            not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "completeQuotation",
            id = ?id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn complete_quotation(
        id: ID,
        ctx: &Context,
    ) -> Result<Option<api::Quotation>, Error> {
        Self::change_status(&id, Transition::Complete, ctx).await
    }

    /// Cancels the specified `PENDING` or `ACCEPTED` `Quotation`.
    ///
    /// The provided `reason` is stored into the provider notes.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `Quotation` ID;
    /// - `INVALID_INPUT` - the provided `reason` is malformed;
    /// - `INVALID_QUOTATION_STATUS_TRANSITION` - the `Quotation` is neither
    ///                                           `PENDING` nor `ACCEPTED`;
    /// - `QUOTATION_NOT_EXISTS` - the `Quotation` with the specified ID does
    ///                            not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cancelQuotation",
            id = ?id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_quotation(
        id: ID,
        reason: Option<String>,
        ctx: &Context,
    ) -> Result<Option<api::Quotation>, Error> {
        let reason = reason
            .map(|r| api::parse("reason", r))
            .transpose()
            .map_err(ctx.error())?;
        Self::change_status(&id, Transition::Cancel(reason), ctx).await
    }

    /// Deletes the specified `Quotation`.
    ///
    /// Returns `false` if there was nothing to delete.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `Quotation` ID.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteQuotation",
            id = ?id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_quotation(
        id: ID,
        ctx: &Context,
    ) -> Result<bool, Error> {
        let id = api::parse_id(&id).map_err(ctx.error())?;
        ctx.marketplace()
            .execute(command::DeleteQuotation { id })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Leaves a new `ServiceReview` on a `Service`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_INPUT` - any of the provided values is malformed;
    /// - `SERVICE_ALREADY_REVIEWED` - the reviewer has already reviewed the
    ///                                `Service`;
    /// - `SERVICE_NOT_EXISTS` - the reviewed `Service` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "addServiceReview",
            otel.name = Self::SPAN_NAME,
            reviewer_id = %input.reviewer_id,
            service_id = input.service_id,
        ),
    )]
    pub async fn add_service_review(
        input: api::review::AddInput,
        ctx: &Context,
    ) -> Result<Option<api::Review>, Error> {
        let cmd =
            command::CreateReview::try_from(input).map_err(ctx.error())?;
        ctx.marketplace()
            .execute(cmd)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|r| Some(r.into()))
    }

    /// Deletes the specified `ServiceReview`.
    ///
    /// Returns `false` if there was nothing to delete.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ID` - the provided ID is not a `ServiceReview` ID.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteServiceReview",
            id = ?id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_service_review(
        id: ID,
        ctx: &Context,
    ) -> Result<bool, Error> {
        let id = api::parse_id(&id).map_err(ctx.error())?;
        ctx.marketplace()
            .execute(command::DeleteReview { id })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }
}

impl Mutation {
    /// Applies the provided [`Transition`] to the [`Quotation`] with the
    /// provided `id`.
    ///
    /// [`Quotation`]: domain::Quotation
    async fn change_status(
        id: &ID,
        transition: Transition,
        ctx: &Context,
    ) -> Result<Option<api::Quotation>, Error> {
        let id = api::parse_id::<domain::quotation::Id>(id)
            .map_err(ctx.error())?;
        ctx.marketplace()
            .execute(command::ChangeQuotationStatus { id, transition })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|q| Some(q.into()))
    }
}

impl AsError for command::create_service::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::SubcategoryNotExists(_) => SubcategoryError::NotExists.into(),
        })
    }
}

impl AsError for command::update_service::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ServiceNotExists(_) => ServiceError::NotExists.into(),
            Self::SubcategoryNotExists(_) => SubcategoryError::NotExists.into(),
        })
    }
}

impl AsError for command::delete_service::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ServiceNotExists(_) => ServiceError::NotExists.into(),
        })
    }
}

impl AsError for command::toggle_service_active::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ServiceNotExists(_) => ServiceError::NotExists.into(),
        })
    }
}

impl AsError for command::create_quotation::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ServiceNotExists(_) => ServiceError::NotExists.into(),
        })
    }
}

impl AsError for command::update_quotation::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::QuotationNotExists(_) => QuotationError::NotExists.into(),
        })
    }
}

impl AsError for command::change_quotation_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_QUOTATION_STATUS_TRANSITION"]
                #[kind = BadRequest]
                #[message = "`Quotation` with the provided ID cannot change \
                             its status this way"]
                InvalidStatusTransition,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidStatusTransition(e) => {
                crate::Error::from(Error::InvalidStatusTransition)
                    .with_message(e)
            }
            Self::QuotationNotExists(_) => QuotationError::NotExists.into(),
        })
    }
}

impl AsError for command::create_review::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "SERVICE_ALREADY_REVIEWED"]
                #[kind = BadRequest]
                #[message = "`Service` with the provided ID is already \
                             reviewed by the reviewer"]
                AlreadyReviewed,
            }
        }

        Some(match self {
            Self::AlreadyReviewed(_) => Error::AlreadyReviewed.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::ServiceNotExists(_) => ServiceError::NotExists.into(),
        })
    }
}

#[cfg(test)]
mod spec {
    use marketplace::{
        command::{create_review, toggle_service_active, update_quotation},
        domain::{quotation, seller, service},
    };

    use crate::{error::Kind, AsError as _};

    #[test]
    fn maps_missing_entities_to_not_found() {
        let err = toggle_service_active::ExecutionError::ServiceNotExists(
            service::Id::from(3),
        )
        .try_as_error()
        .expect("exposed");
        assert_eq!(err.code, "SERVICE_NOT_EXISTS");
        assert_eq!(err.kind, Kind::NotFound);

        let err = update_quotation::ExecutionError::QuotationNotExists(
            quotation::Id::from(9),
        )
        .try_as_error()
        .expect("exposed");
        assert_eq!(err.code, "QUOTATION_NOT_EXISTS");
    }

    #[test]
    fn maps_conflicts_to_bad_request() {
        let reviewer = "seller-1".parse::<seller::Id>().expect("valid id");
        let err = create_review::ExecutionError::AlreadyReviewed(reviewer)
        .try_as_error()
        .expect("exposed");
        assert_eq!(err.code, "SERVICE_ALREADY_REVIEWED");
        assert_eq!(err.kind, Kind::BadRequest);
        assert_eq!(err.kind.status_code(), http::StatusCode::BAD_REQUEST);
    }
}
