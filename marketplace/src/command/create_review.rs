//! [`Command`] for leaving a new [`Review`] on a [`Service`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    unit, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{review, seller, service, Review, Service},
    infra::{database, Database},
    Marketplace,
};

use super::Command;

/// Name of the unique constraint allowing a single [`Review`] per reviewer
/// of a [`Service`].
const REVIEWER_UNIQUE_CONSTRAINT: &str = "service_reviews_reviewer_uniq";

/// [`Command`] for leaving a new [`Review`] on a [`Service`].
#[derive(Clone, Debug)]
pub struct CreateReview {
    /// ID of the reviewed [`Service`].
    pub service_id: service::Id,

    /// ID of the reviewer.
    pub reviewer_id: seller::Id,

    /// [`review::Rating`] of a new [`Review`].
    pub rating: review::Rating,

    /// [`review::Comment`] of a new [`Review`].
    pub comment: Option<review::Comment>,
}

impl<Db> Command<CreateReview> for Marketplace<Db>
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
            Select<By<Option<Review>, (service::Id, seller::Id)>>,
            Ok = Option<Review>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<review::Id, unit::Creation>>,
            Ok = review::Id,
            Err = Traced<database::Error>,
        > + Database<Insert<Review>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Review;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateReview) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateReview {
            service_id,
            reviewer_id,
            rating,
            comment,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent reviews of the same `Service`.
        tx.execute(Lock(By::<Service, _>::new(service_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Select(By::<Option<Service>, _>::new(service_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ServiceNotExists(service_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let existing = tx
            .execute(Select(By::<Option<Review>, _>::new((
                service_id,
                reviewer_id.clone(),
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::AlreadyReviewed(reviewer_id)));
        }

        let id = tx
            .execute(Select(By::<review::Id, _>::new(unit::Creation)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let review = Review {
            id,
            service_id,
            reviewer_id,
            rating,
            comment,
            created_at: DateTime::now().coerce(),
        };

        tx.execute(Insert(review.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map_err(|e| match e.as_ref() {
                E::Db(db)
                    if db.is_unique_violation(Some(
                        REVIEWER_UNIQUE_CONSTRAINT,
                    )) =>
                {
                    tracerr::new!(E::AlreadyReviewed(
                        review.reviewer_id.clone()
                    ))
                }
                E::AlreadyReviewed(_) | E::Db(_) | E::ServiceNotExists(_) => e,
            })
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(review)
    }
}

/// Error of [`CreateReview`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Reviewer has already reviewed the [`Service`].
    #[display("`Seller(id: {_0})` has already reviewed the `Service`")]
    AlreadyReviewed(#[error(not(source))] seller::Id),

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
    use crate::{
        domain::review::{self, Rating},
        fixture, Command as _,
    };

    use super::{CreateReview, ExecutionError};

    fn review(service_id: crate::domain::service::Id) -> CreateReview {
        CreateReview {
            service_id,
            reviewer_id: fixture::seller_id("reviewer-1"),
            rating: Rating::new(4).expect("valid rating"),
            comment: review::Comment::new("Quick and clean"),
        }
    }

    #[tokio::test]
    async fn creates_review() {
        let (market, db) = fixture::marketplace();
        let service = fixture::service(&market, &db).await;

        let created = market
            .execute(review(service.id))
            .await
            .expect("created");

        assert_eq!(created.service_id, service.id);
        assert_eq!(i32::from(created.rating), 4);
    }

    #[tokio::test]
    async fn allows_single_review_per_reviewer() {
        let (market, db) = fixture::marketplace();
        let service = fixture::service(&market, &db).await;
        _ = market.execute(review(service.id)).await.expect("created");

        let err = market
            .execute(review(service.id))
            .await
            .expect_err("already reviewed");
        assert!(matches!(err.as_ref(), ExecutionError::AlreadyReviewed(_)));

        _ = market
            .execute(CreateReview {
                reviewer_id: fixture::seller_id("reviewer-2"),
                ..review(service.id)
            })
            .await
            .expect("another reviewer");
    }

    #[tokio::test]
    async fn requires_existing_service() {
        let (market, _) = fixture::marketplace();

        let err = market
            .execute(review(12.into()))
            .await
            .expect_err("no service");

        assert!(matches!(err.as_ref(), ExecutionError::ServiceNotExists(_)));
    }
}
