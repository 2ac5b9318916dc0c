//! [`Command`] for updating a [`Quotation`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        quotation,
        service::{Minutes, Price},
        Quotation,
    },
    infra::{database, Database},
    Marketplace,
};

use super::Command;

/// [`Command`] for updating a [`Quotation`].
///
/// Absent fields are left unchanged. Unlike [`ChangeQuotationStatus`], the
/// [`quotation::Status`] is overwritten as is.
///
/// [`ChangeQuotationStatus`]: super::ChangeQuotationStatus
#[derive(Clone, Debug)]
pub struct UpdateQuotation {
    /// ID of the [`Quotation`] to be updated.
    pub id: quotation::Id,

    /// New estimated [`Price`] of the quoted work.
    pub estimated_price: Option<Price>,

    /// Final [`Price`] of the quoted work.
    pub final_price: Option<Price>,

    /// New estimated duration of the quoted work.
    pub estimated_duration: Option<Minutes>,

    /// New [`quotation::Status`] of the [`Quotation`].
    pub status: Option<quotation::Status>,

    /// New [`quotation::Notes`] of the client.
    pub client_notes: Option<quotation::Notes>,

    /// New [`quotation::Notes`] of the provider.
    pub provider_notes: Option<quotation::Notes>,

    /// New [`quotation::Attachment`]s of the [`Quotation`].
    pub attachments: Option<Vec<quotation::Attachment>>,

    /// New expiration [`DateTime`] of the [`Quotation`].
    pub expires_at: Option<quotation::ExpirationDateTime>,
}

impl UpdateQuotation {
    /// Creates a new [`UpdateQuotation`] [`Command`] changing nothing in the
    /// [`Quotation`] with the provided ID.
    #[must_use]
    pub fn new(id: quotation::Id) -> Self {
        Self {
            id,
            estimated_price: None,
            final_price: None,
            estimated_duration: None,
            status: None,
            client_notes: None,
            provider_notes: None,
            attachments: None,
            expires_at: None,
        }
    }
}

impl<Db> Command<UpdateQuotation> for Marketplace<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Quotation, quotation::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Quotation>, quotation::Id>>,
            Ok = Option<Quotation>,
            Err = Traced<database::Error>,
        > + Database<Update<Quotation>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Quotation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateQuotation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateQuotation {
            id,
            estimated_price,
            final_price,
            estimated_duration,
            status,
            client_notes,
            provider_notes,
            attachments,
            expires_at,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::<Quotation, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut quotation = tx
            .execute(Select(By::<Option<Quotation>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::QuotationNotExists(id))
            .map_err(tracerr::wrap!())?;

        quotation.estimated_price =
            estimated_price.or(quotation.estimated_price);
        quotation.final_price = final_price.or(quotation.final_price);
        quotation.estimated_duration =
            estimated_duration.or(quotation.estimated_duration);
        if let Some(status) = status {
            quotation.status = status;
        }
        if let Some(notes) = client_notes {
            quotation.client_notes = Some(notes);
        }
        if let Some(notes) = provider_notes {
            quotation.provider_notes = Some(notes);
        }
        if let Some(attachments) = attachments {
            quotation.attachments = attachments;
        }
        quotation.expires_at = expires_at.or(quotation.expires_at);
        quotation.updated_at = DateTime::now().coerce();

        tx.execute(Update(quotation.clone()))
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

/// Error of [`UpdateQuotation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Quotation`] with the provided ID does not exist.
    #[display("`Quotation(id: {_0})` does not exist")]
    QuotationNotExists(#[error(not(source))] quotation::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{quotation, service::Price},
        fixture, Command as _,
    };

    use super::{ExecutionError, UpdateQuotation};

    #[tokio::test]
    async fn updates_only_provided_fields() {
        let (market, db) = fixture::marketplace();
        let service = fixture::service(&market, &db).await;
        let original = fixture::quotation(&market, &service).await;

        let updated = market
            .execute(UpdateQuotation {
                final_price: Price::from_f64(120.0),
                provider_notes: quotation::Notes::new("Parts included"),
                ..UpdateQuotation::new(original.id)
            })
            .await
            .expect("updated");

        assert_eq!(updated.final_price, Price::from_f64(120.0));
        assert_eq!(
            updated.provider_notes.as_ref().map(AsRef::as_ref),
            Some("Parts included"),
        );
        assert_eq!(updated.title, original.title);
        assert_eq!(updated.status, original.status);
        assert_eq!(db.quotations(), vec![updated]);
    }

    #[tokio::test]
    async fn overwrites_status_as_is() {
        let (market, db) = fixture::marketplace();
        let service = fixture::service(&market, &db).await;
        let original = fixture::quotation(&market, &service).await;

        let updated = market
            .execute(UpdateQuotation {
                status: Some(quotation::Status::Completed),
                ..UpdateQuotation::new(original.id)
            })
            .await
            .expect("updated");

        assert_eq!(updated.status, quotation::Status::Completed);
    }

    #[tokio::test]
    async fn fails_on_missing_quotation() {
        let (market, _) = fixture::marketplace();

        let err = market
            .execute(UpdateQuotation::new(5.into()))
            .await
            .expect_err("no quotation");

        assert!(matches!(
            err.as_ref(),
            ExecutionError::QuotationNotExists(_),
        ));
    }
}
