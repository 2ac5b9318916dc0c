//! [`Command`] for deleting a [`Quotation`].

use common::operations::{By, Delete};
use tracerr::Traced;

use crate::{
    domain::{quotation, Quotation},
    infra::{database, Database},
    Marketplace,
};

use super::Command;

/// [`Command`] for deleting a [`Quotation`].
///
/// Results in `false` if there was nothing to delete.
#[derive(Clone, Copy, Debug)]
pub struct DeleteQuotation {
    /// ID of the [`Quotation`] to be deleted.
    pub id: quotation::Id,
}

impl<Db> Command<DeleteQuotation> for Marketplace<Db>
where
    Db: Database<
        Delete<By<Quotation, quotation::Id>>,
        Ok = bool,
        Err = Traced<database::Error>,
    >,
{
    type Ok = bool;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteQuotation,
    ) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Delete(By::<Quotation, _>::new(cmd.id)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`DeleteQuotation`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use crate::{fixture, Command as _};

    use super::DeleteQuotation;

    #[tokio::test]
    async fn reports_whether_deleted() {
        let (market, db) = fixture::marketplace();
        let service = fixture::service(&market, &db).await;
        let quotation = fixture::quotation(&market, &service).await;

        let cmd = DeleteQuotation { id: quotation.id };
        assert!(market.execute(cmd).await.expect("deleted"));
        assert!(db.quotations().is_empty());
        assert!(!market.execute(cmd).await.expect("nothing to delete"));
    }
}
