//! [`Command`] for moving a [`Quotation`] through its lifecycle.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        quotation::{self, TransitionError},
        Quotation,
    },
    infra::{database, Database},
    Marketplace,
};

use super::Command;

/// [`Command`] for moving a [`Quotation`] to another [`quotation::Status`].
#[derive(Clone, Debug)]
pub struct ChangeQuotationStatus {
    /// ID of the [`Quotation`] to be changed.
    pub id: quotation::Id,

    /// [`Transition`] to be applied.
    pub transition: Transition,
}

/// Lifecycle transition of a [`Quotation`].
#[derive(Clone, Debug)]
pub enum Transition {
    /// [`quotation::Status::Pending`] to [`quotation::Status::Accepted`].
    Accept,

    /// [`quotation::Status::Pending`] to [`quotation::Status::Declined`],
    /// with an optional reason.
    Decline(Option<quotation::Notes>),

    /// [`quotation::Status::Accepted`] to [`quotation::Status::Completed`].
    Complete,

    /// [`quotation::Status::Pending`] or [`quotation::Status::Accepted`] to
    /// [`quotation::Status::Cancelled`], with an optional reason.
    Cancel(Option<quotation::Notes>),
}

impl Transition {
    /// Applies this [`Transition`] to the provided [`Quotation`].
    fn apply(
        self,
        quotation: &mut Quotation,
        now: DateTime,
    ) -> Result<(), TransitionError> {
        match self {
            Self::Accept => quotation.accept(now),
            Self::Decline(reason) => quotation.decline(reason, now),
            Self::Complete => quotation.complete(now),
            Self::Cancel(reason) => quotation.cancel(reason, now),
        }
    }
}

impl<Db> Command<ChangeQuotationStatus> for Marketplace<Db>
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
        cmd: ChangeQuotationStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ChangeQuotationStatus { id, transition } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent transitions of the same `Quotation`.
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

        transition
            .apply(&mut quotation, DateTime::now())
            .map_err(E::InvalidStatusTransition)
            .map_err(tracerr::wrap!())?;

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

/// Error of [`ChangeQuotationStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Requested [`Transition`] isn't allowed from the current
    /// [`quotation::Status`].
    #[display("{_0}")]
    InvalidStatusTransition(TransitionError),

    /// [`Quotation`] with the provided ID does not exist.
    #[display("`Quotation(id: {_0})` does not exist")]
    QuotationNotExists(#[error(not(source))] quotation::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::quotation::{self, Status},
        fixture, Command as _,
    };

    use super::{ChangeQuotationStatus, ExecutionError, Transition};

    #[tokio::test]
    async fn walks_happy_path() {
        let (market, db) = fixture::marketplace();
        let service = fixture::service(&market, &db).await;
        let created = fixture::quotation(&market, &service).await;

        let accepted = market
            .execute(ChangeQuotationStatus {
                id: created.id,
                transition: Transition::Accept,
            })
            .await
            .expect("accepted");
        assert_eq!(accepted.status, Status::Accepted);
        assert!(accepted.accepted_at.is_some());

        let completed = market
            .execute(ChangeQuotationStatus {
                id: created.id,
                transition: Transition::Complete,
            })
            .await
            .expect("completed");
        assert_eq!(completed.status, Status::Completed);
        assert!(completed.completed_at.is_some());
        assert_eq!(db.quotations(), vec![completed]);
    }

    #[tokio::test]
    async fn stores_decline_reason() {
        let (market, db) = fixture::marketplace();
        let service = fixture::service(&market, &db).await;
        let created = fixture::quotation(&market, &service).await;

        let declined = market
            .execute(ChangeQuotationStatus {
                id: created.id,
                transition: Transition::Decline(quotation::Notes::new(
                    "Fully booked",
                )),
            })
            .await
            .expect("declined");

        assert_eq!(declined.status, Status::Declined);
        assert_eq!(
            declined.provider_notes.as_ref().map(AsRef::as_ref),
            Some("Fully booked"),
        );
    }

    #[tokio::test]
    async fn rejects_invalid_transition() {
        let (market, db) = fixture::marketplace();
        let service = fixture::service(&market, &db).await;
        let created = fixture::quotation(&market, &service).await;

        let err = market
            .execute(ChangeQuotationStatus {
                id: created.id,
                transition: Transition::Complete,
            })
            .await
            .expect_err("not accepted yet");

        assert!(matches!(
            err.as_ref(),
            ExecutionError::InvalidStatusTransition(e)
                if e.from == Status::Pending && e.to == Status::Completed,
        ));
        assert_eq!(db.quotations(), vec![created]);
    }

    #[tokio::test]
    async fn fails_on_missing_quotation() {
        let (market, _) = fixture::marketplace();

        let err = market
            .execute(ChangeQuotationStatus {
                id: 8.into(),
                transition: Transition::Cancel(None),
            })
            .await
            .expect_err("no quotation");

        assert!(matches!(
            err.as_ref(),
            ExecutionError::QuotationNotExists(_),
        ));
    }
}
