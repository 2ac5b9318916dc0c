//! [`Command`] for deleting a [`Service`].

use common::operations::{By, Commit, Delete, Lock, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{service, Service},
    infra::{database, Database},
    Marketplace,
};

use super::Command;

/// [`Command`] for deleting a [`Service`] along with its quotations and
/// reviews.
#[derive(Clone, Copy, Debug)]
pub struct DeleteService {
    /// ID of the [`Service`] to be deleted.
    pub id: service::Id,
}

impl<Db> Command<DeleteService> for Marketplace<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Service, service::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Service>, service::Id>>,
            Ok = Option<Service>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Service, service::Id>>,
            Ok = bool,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Service;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteService) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteService { id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::<Service, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let service = tx
            .execute(Select(By::<Option<Service>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ServiceNotExists(id))
            .map_err(tracerr::wrap!())?;

        let deleted = tx
            .execute(Delete(By::<Service, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !deleted {
            return Err(tracerr::new!(E::ServiceNotExists(id)));
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(service)
    }
}

/// Error of [`DeleteService`] [`Command`] execution.
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
    use crate::{fixture, Command as _};

    use super::{DeleteService, ExecutionError};

    #[tokio::test]
    async fn returns_deleted_service() {
        let (market, db) = fixture::marketplace();
        let service = fixture::service(&market, &db).await;
        _ = fixture::quotation(&market, &service).await;

        let deleted = market
            .execute(DeleteService { id: service.id })
            .await
            .expect("deleted");

        assert_eq!(deleted, service);
        assert_eq!(fixture::service_by_id(&market, service.id).await, None);
        assert!(db.quotations().is_empty());
    }

    #[tokio::test]
    async fn fails_on_missing_service() {
        let (market, _) = fixture::marketplace();

        let err = market
            .execute(DeleteService { id: 3.into() })
            .await
            .expect_err("no service");

        assert!(matches!(err.as_ref(), ExecutionError::ServiceNotExists(_)));
    }
}
