//! [`Command`] for toggling activity of a [`Service`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{service, Service},
    infra::{database, Database},
    Marketplace,
};

use super::Command;

/// [`Command`] for flipping the [`Service::is_active`] indicator.
#[derive(Clone, Copy, Debug)]
pub struct ToggleServiceActive {
    /// ID of the [`Service`] to be toggled.
    pub id: service::Id,
}

impl<Db> Command<ToggleServiceActive> for Marketplace<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Service, service::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Service>, service::Id>>,
            Ok = Option<Service>,
            Err = Traced<database::Error>,
        > + Database<Update<Service>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Service;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ToggleServiceActive,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ToggleServiceActive { id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::<Service, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut service = tx
            .execute(Select(By::<Option<Service>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ServiceNotExists(id))
            .map_err(tracerr::wrap!())?;

        service.is_active = !service.is_active;
        service.updated_at = DateTime::now().coerce();

        tx.execute(Update(service.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(service)
    }
}

/// Error of [`ToggleServiceActive`] [`Command`] execution.
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

    use super::{ExecutionError, ToggleServiceActive};

    #[tokio::test]
    async fn flips_activity_back_and_forth() {
        let (market, db) = fixture::marketplace();
        let service = fixture::service(&market, &db).await;
        assert!(service.is_active);

        let off = market
            .execute(ToggleServiceActive { id: service.id })
            .await
            .expect("toggled");
        assert!(!off.is_active);

        let on = market
            .execute(ToggleServiceActive { id: service.id })
            .await
            .expect("toggled");
        assert!(on.is_active);
    }

    #[tokio::test]
    async fn fails_on_missing_service() {
        let (market, _) = fixture::marketplace();

        let err = market
            .execute(ToggleServiceActive { id: 1.into() })
            .await
            .expect_err("no service");

        assert!(matches!(err.as_ref(), ExecutionError::ServiceNotExists(_)));
    }
}
