//! [`Command`] for creating a new [`Quotation`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    unit, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        quotation, seller,
        service::{self, Minutes, Price},
        Quotation, Service,
    },
    infra::{database, Database},
    Marketplace,
};

use super::Command;

/// [`Command`] for requesting a new [`Quotation`] of a [`Service`].
#[derive(Clone, Debug)]
pub struct CreateQuotation {
    /// ID of the quoted [`Service`].
    pub service_id: service::Id,

    /// ID of the client requesting a new [`Quotation`].
    pub client_id: seller::Id,

    /// ID of the provider of the quoted [`Service`].
    pub provider_id: seller::Id,

    /// [`quotation::Title`] of a new [`Quotation`].
    pub title: quotation::Title,

    /// [`quotation::Description`] of a new [`Quotation`].
    pub description: quotation::Description,

    /// Estimated [`Price`] of the quoted work.
    pub estimated_price: Option<Price>,

    /// Estimated duration of the quoted work.
    pub estimated_duration: Option<Minutes>,

    /// [`quotation::Notes`] of the client.
    pub client_notes: Option<quotation::Notes>,

    /// [`quotation::Attachment`]s of a new [`Quotation`].
    ///
    /// [`None`] means no attachments.
    pub attachments: Option<Vec<quotation::Attachment>>,

    /// [`DateTime`] after which a new [`Quotation`] expires, if not
    /// answered.
    pub expires_at: Option<quotation::ExpirationDateTime>,
}

impl<Db> Command<CreateQuotation> for Marketplace<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Service>, service::Id>>,
            Ok = Option<Service>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<quotation::Id, unit::Creation>>,
            Ok = quotation::Id,
            Err = Traced<database::Error>,
        > + Database<Insert<Quotation>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Quotation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateQuotation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateQuotation {
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
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Select(By::<Option<Service>, _>::new(service_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ServiceNotExists(service_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let id = tx
            .execute(Select(By::<quotation::Id, _>::new(unit::Creation)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let now = DateTime::now();
        let quotation = Quotation {
            id,
            service_id,
            client_id,
            provider_id,
            title,
            description,
            estimated_price,
            final_price: None,
            estimated_duration,
            status: quotation::Status::Pending,
            client_notes,
            provider_notes: None,
            attachments: attachments.unwrap_or_default(),
            created_at: now.coerce(),
            updated_at: now.coerce(),
            expires_at,
            accepted_at: None,
            completed_at: None,
        };

        tx.execute(Insert(quotation.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(quotation)
    }
}

/// Error of [`CreateQuotation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Service`] with the provided ID does not exist.
    #[display("`Service(id: {_0})` does not exist")]
    ServiceNotExists(#[error(not(source))] service::Id),
}

#[cfg(test)]
mod spec {
    use crate::{domain::quotation, fixture, Command as _};

    use super::{CreateQuotation, ExecutionError};

    #[tokio::test]
    async fn creates_pending_quotation() {
        let (market, db) = fixture::marketplace();
        let service = fixture::service(&market, &db).await;

        let created = fixture::quotation(&market, &service).await;

        assert_eq!(created.status, quotation::Status::Pending);
        assert_eq!(created.service_id, service.id);
        assert!(created.attachments.is_empty());
        assert_eq!(created.final_price, None);
        assert_eq!(created.accepted_at, None);
        assert_eq!(db.quotations(), vec![created]);
    }

    #[tokio::test]
    async fn keeps_provided_attachments() {
        let (market, db) = fixture::marketplace();
        let service = fixture::service(&market, &db).await;
        let file = quotation::Attachment::new("https://files.example/a.png")
            .expect("valid attachment");

        let created = market
            .execute(CreateQuotation {
                attachments: Some(vec![file.clone()]),
                ..fixture::create_quotation(&service)
            })
            .await
            .expect("created");

        assert_eq!(created.attachments, vec![file]);
    }

    #[tokio::test]
    async fn requires_existing_service() {
        let (market, db) = fixture::marketplace();
        let mut service = fixture::service(&market, &db).await;
        service.id = 100.into();

        let err = market
            .execute(fixture::create_quotation(&service))
            .await
            .expect_err("no service");

        assert!(matches!(err.as_ref(), ExecutionError::ServiceNotExists(_)));
    }
}
