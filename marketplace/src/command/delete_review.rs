//! [`Command`] for deleting a [`Review`].

use common::operations::{By, Delete};
use tracerr::Traced;

use crate::{
    domain::{review, Review},
    infra::{database, Database},
    Marketplace,
};

use super::Command;

/// [`Command`] for deleting a [`Review`].
///
/// Results in `false` if there was nothing to delete.
#[derive(Clone, Copy, Debug)]
pub struct DeleteReview {
    /// ID of the [`Review`] to be deleted.
    pub id: review::Id,
}

impl<Db> Command<DeleteReview> for Marketplace<Db>
where
    Db: Database<
        Delete<By<Review, review::Id>>,
        Ok = bool,
        Err = Traced<database::Error>,
    >,
{
    type Ok = bool;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteReview) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Delete(By::<Review, _>::new(cmd.id)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`DeleteReview`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use crate::{
        command::CreateReview,
        domain::review::Rating,
        fixture, Command as _,
    };

    use super::DeleteReview;

    #[tokio::test]
    async fn reports_whether_deleted() {
        let (market, db) = fixture::marketplace();
        let service = fixture::service(&market, &db).await;
        let review = market
            .execute(CreateReview {
                service_id: service.id,
                reviewer_id: fixture::seller_id("reviewer-1"),
                rating: Rating::MAX,
                comment: None,
            })
            .await
            .expect("created");

        let cmd = DeleteReview { id: review.id };
        assert!(market.execute(cmd).await.expect("deleted"));
        assert!(!market.execute(cmd).await.expect("nothing to delete"));
    }
}
