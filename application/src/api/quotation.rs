//! [`Quotation`]-related definitions.

use common::{DateTime, Handler as _};
use derive_more::From;
use juniper::{graphql_object, GraphQLEnum, GraphQLInputObject, ID};
use marketplace::{command, domain, query};

use crate::{
    api::{
        self,
        service::{minutes, price},
    },
    AsError, Context, Error,
};

/// A request of a client for a price and a schedule of a `Service`.
#[derive(Clone, Debug, From)]
pub struct Quotation(domain::Quotation);

/// A request of a client for a price and a schedule of a `Service`.
#[graphql_object(context = Context)]
impl Quotation {
    /// Unique identifier of this `Quotation`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quotation.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> ID {
        ID::from(self.0.id.to_string())
    }

    /// ID of the quoted `Service`.
    pub fn service_id(&self) -> i32 {
        self.0.service_id.into()
    }

    /// ID of the `Seller` requesting this `Quotation`.
    pub fn client_id(&self) -> &str {
        self.0.client_id.as_ref()
    }

    /// ID of the `Seller` providing the quoted `Service`.
    pub fn provider_id(&self) -> &str {
        self.0.provider_id.as_ref()
    }

    /// Title of this `Quotation`.
    pub fn title(&self) -> &str {
        self.0.title.as_ref()
    }

    /// Description of this `Quotation`.
    pub fn description(&self) -> &str {
        self.0.description.as_ref()
    }

    /// Price estimated by the provider.
    pub fn estimated_price(&self) -> Option<f64> {
        self.0.estimated_price.map(domain::service::Price::to_f64)
    }

    /// Price agreed upon.
    pub fn final_price(&self) -> Option<f64> {
        self.0.final_price.map(domain::service::Price::to_f64)
    }

    /// Duration estimated by the provider in minutes.
    pub fn estimated_duration(&self) -> Option<i32> {
        self.0.estimated_duration.map(Into::into)
    }

    /// Status of this `Quotation`.
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Notes of the client.
    pub fn client_notes(&self) -> Option<&str> {
        self.0.client_notes.as_ref().map(AsRef::as_ref)
    }

    /// Notes of the provider.
    pub fn provider_notes(&self) -> Option<&str> {
        self.0.provider_notes.as_ref().map(AsRef::as_ref)
    }

    /// URLs of files attached to this `Quotation`.
    pub fn attachments(&self) -> Vec<String> {
        self.0.attachments.iter().map(ToString::to_string).collect()
    }

    /// `DateTime` when this `Quotation` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Quotation` was modified last time.
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }

    /// `DateTime` when this `Quotation` expires, if not answered.
    pub fn expires_at(&self) -> Option<DateTime> {
        self.0.expires_at.map(|at| at.coerce())
    }

    /// `DateTime` when this `Quotation` was accepted.
    pub fn accepted_at(&self) -> Option<DateTime> {
        self.0.accepted_at.map(|at| at.coerce())
    }

    /// `DateTime` when this `Quotation` was completed.
    pub fn completed_at(&self) -> Option<DateTime> {
        self.0.completed_at.map(|at| at.coerce())
    }

    /// Quoted `Service`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quotation.service",
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

    /// `Seller` requesting this `Quotation`.
    pub fn client(&self) -> Option<api::Seller> {
        Some(self.0.client_id.clone().into())
    }

    /// `Seller` providing the quoted `Service`.
    pub fn provider(&self) -> Option<api::Seller> {
        Some(self.0.provider_id.clone().into())
    }
}

/// Status of a `Quotation`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "QuotationStatus")]
pub enum Status {
    /// Awaits a response of the provider.
    Pending,

    /// Accepted by the provider.
    Accepted,

    /// Declined by the provider.
    Declined,

    /// Work is done.
    Completed,

    /// Cancelled before completion.
    Cancelled,

    /// Was not answered before its expiration.
    Expired,
}

impl From<domain::quotation::Status> for Status {
    fn from(status: domain::quotation::Status) -> Self {
        use domain::quotation::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Accepted => Self::Accepted,
            S::Declined => Self::Declined,
            S::Completed => Self::Completed,
            S::Cancelled => Self::Cancelled,
            S::Expired => Self::Expired,
        }
    }
}

impl From<Status> for domain::quotation::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => Self::Pending,
            Status::Accepted => Self::Accepted,
            Status::Declined => Self::Declined,
            Status::Completed => Self::Completed,
            Status::Cancelled => Self::Cancelled,
            Status::Expired => Self::Expired,
        }
    }
}

/// Input for requesting a new `Quotation`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "AddQuotationInput")]
pub struct AddInput {
    /// ID of the quoted `Service`.
    pub service_id: i32,

    /// ID of the `Seller` requesting the `Quotation`.
    pub client_id: String,

    /// ID of the `Seller` providing the quoted `Service`.
    pub provider_id: String,

    /// Title of the `Quotation`.
    pub title: String,

    /// Description of the `Quotation`.
    pub description: String,

    /// Estimated price of the quoted work.
    pub estimated_price: Option<f64>,

    /// Estimated duration of the quoted work in minutes.
    pub estimated_duration: Option<i32>,

    /// Notes of the client.
    pub client_notes: Option<String>,

    /// URLs of files attached to the `Quotation`.
    pub attachments: Option<Vec<String>>,

    /// `DateTime` after which the `Quotation` expires, if not answered.
    pub expires_at: Option<DateTime>,
}

impl TryFrom<AddInput> for command::CreateQuotation {
    type Error = Error;

    fn try_from(input: AddInput) -> Result<Self, Self::Error> {
        let AddInput {
            service_id,
            client_id,
            provider_id,
            title,
            description,
            estimated_price,
            estimated_duration,
            client_notes,
            attachments,
            expires_at,
        } = input;

        Ok(Self {
            service_id: service_id.into(),
            client_id: api::parse("clientId", client_id)?,
            provider_id: api::parse("providerId", provider_id)?,
            title: api::parse("title", title)?,
            description: api::parse("description", description)?,
            estimated_price: estimated_price
                .map(|p| price("estimatedPrice", p))
                .transpose()?,
            estimated_duration: estimated_duration
                .map(|d| minutes("estimatedDuration", d))
                .transpose()?,
            client_notes: client_notes
                .map(|n| api::parse("clientNotes", n))
                .transpose()?,
            attachments: attachments
                .map(|a| api::parse_all("attachments", a))
                .transpose()?,
            expires_at: expires_at.map(DateTime::coerce),
        })
    }
}

/// Input for updating an existing `Quotation`.
///
/// Absent fields are left unchanged.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "UpdateQuotationInput")]
pub struct UpdateInput {
    /// ID of the `Quotation` to update.
    pub id: ID,

    /// New estimated price of the quoted work.
    pub estimated_price: Option<f64>,

    /// Final price of the quoted work.
    pub final_price: Option<f64>,

    /// New estimated duration of the quoted work in minutes.
    pub estimated_duration: Option<i32>,

    /// New status of the `Quotation`, set as is.
    pub status: Option<Status>,

    /// New notes of the client.
    pub client_notes: Option<String>,

    /// New notes of the provider.
    pub provider_notes: Option<String>,

    /// New URLs of files attached to the `Quotation`.
    pub attachments: Option<Vec<String>>,

    /// New expiration `DateTime` of the `Quotation`.
    pub expires_at: Option<DateTime>,
}

impl TryFrom<UpdateInput> for command::UpdateQuotation {
    type Error = Error;

    fn try_from(input: UpdateInput) -> Result<Self, Self::Error> {
        let UpdateInput {
            id,
            estimated_price,
            final_price,
            estimated_duration,
            status,
            client_notes,
            provider_notes,
            attachments,
            expires_at,
        } = input;

        Ok(Self {
            id: api::parse_id(&id)?,
            estimated_price: estimated_price
                .map(|p| price("estimatedPrice", p))
                .transpose()?,
            final_price: final_price
                .map(|p| price("finalPrice", p))
                .transpose()?,
            estimated_duration: estimated_duration
                .map(|d| minutes("estimatedDuration", d))
                .transpose()?,
            status: status.map(Into::into),
            client_notes: client_notes
                .map(|n| api::parse("clientNotes", n))
                .transpose()?,
            provider_notes: provider_notes
                .map(|n| api::parse("providerNotes", n))
                .transpose()?,
            attachments: attachments
                .map(|a| api::parse_all("attachments", a))
                .transpose()?,
            expires_at: expires_at.map(DateTime::coerce),
        })
    }
}

pub mod list {
    //! Definitions related to the [`Quotation`] list.

    use common::Handler as _;
    use marketplace::{query, read};

    use super::Quotation;
    use crate::{api, define_connection, AsError, Context, Error};

    define_connection! {
        #[doc = "A page of `Quotation`s."]
        #[graphql(name = "QuotationConnection")]
        struct Connection(read::quotation::list::Page => Quotation);
    }

    /// Selects a page of [`Quotation`]s matching the provided `filter`.
    ///
    /// # Errors
    ///
    /// If the [`Marketplace`] fails to select the page.
    ///
    /// [`Marketplace`]: crate::Marketplace
    pub(crate) async fn select(
        filter: read::quotation::list::Filter,
        page: Option<i32>,
        page_size: Option<i32>,
        ctx: &Context,
    ) -> Result<Connection, Error> {
        ctx.marketplace()
            .execute(query::quotation::List::by(
                read::quotation::list::Selector {
                    arguments: api::pagination::arguments(page, page_size),
                    filter,
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

#[cfg(test)]
mod spec {
    use juniper::ID;
    use marketplace::{command, domain::quotation};

    use super::{AddInput, Status, UpdateInput};

    fn add_input() -> AddInput {
        AddInput {
            service_id: 1,
            client_id: "client-1".to_owned(),
            provider_id: "seller-1".to_owned(),
            title: "Fix the sink".to_owned(),
            description: "Kitchen sink leaks".to_owned(),
            estimated_price: None,
            estimated_duration: None,
            client_notes: None,
            attachments: None,
            expires_at: None,
        }
    }

    #[test]
    fn converts_add_input() {
        let cmd = command::CreateQuotation::try_from(add_input())
            .expect("valid input");
        assert_eq!(cmd.title.as_ref(), "Fix the sink");
        assert!(cmd.attachments.is_none());
    }

    #[test]
    fn rejects_blank_title() {
        let err = command::CreateQuotation::try_from(AddInput {
            title: "   ".to_owned(),
            ..add_input()
        })
        .expect_err("blank title");
        assert_eq!(err.code, "INVALID_INPUT");
        assert!(err.message.contains("title"));
    }

    #[test]
    fn overwrites_status_as_is() {
        let cmd = command::UpdateQuotation::try_from(UpdateInput {
            id: ID::from("3".to_owned()),
            estimated_price: None,
            final_price: Some(120.0),
            estimated_duration: None,
            status: Some(Status::Completed),
            client_notes: None,
            provider_notes: None,
            attachments: None,
            expires_at: None,
        })
        .expect("valid input");
        assert_eq!(cmd.id, quotation::Id::from(3));
        assert_eq!(cmd.status, Some(quotation::Status::Completed));
        assert!(cmd.final_price.is_some());
    }

    #[test]
    fn rejects_non_numeric_id() {
        let err = command::UpdateQuotation::try_from(UpdateInput {
            id: ID::from("q-3".to_owned()),
            estimated_price: None,
            final_price: None,
            estimated_duration: None,
            status: None,
            client_notes: None,
            provider_notes: None,
            attachments: None,
            expires_at: None,
        })
        .expect_err("invalid ID");
        assert_eq!(err.code, "INVALID_ID");
    }
}
