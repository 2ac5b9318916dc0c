//! [`Query`] definition.

pub mod category;
pub mod quotation;
pub mod review;
pub mod service;
pub mod subcategory;

use std::marker::PhantomData;

use common::{
    operations::{By, Select},
    pagination::{Node, Page, Selector, TotalCount},
};
use futures::future;
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    Marketplace,
};

/// [`Query`] of the [`Marketplace`].
pub use common::Handler as Query;

/// [`Query`] [`Select`]ing a `T`ype from a [`Database`].
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct DatabaseQuery<T>(T);

impl<W, B> DatabaseQuery<By<W, B>> {
    /// Creates a new [`DatabaseQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<Db, W, B> Query<DatabaseQuery<By<W, B>>> for Marketplace<Db>
where
    Db: Database<Select<By<W, B>>, Ok = W, Err = Traced<database::Error>>,
{
    type Ok = W;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        DatabaseQuery(by): DatabaseQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Select(by))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// [`Query`] selecting a [`Page`] of `N`odes.
///
/// The [`Page`] nodes and their [`TotalCount`] are selected by two separate
/// concurrent reads, so writes committed in between may make them disagree.
#[derive(Clone, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct PageQuery<N, F> {
    /// [`Selector`] of the [`Page`].
    selector: Selector<F>,

    /// Type of the [`Page`] nodes.
    _node: PhantomData<N>,
}

impl<N, F> PageQuery<N, F> {
    /// Creates a new [`PageQuery`] selecting a [`Page`] by the provided
    /// [`Selector`].
    #[must_use]
    pub fn by(selector: Selector<F>) -> Self {
        Self {
            selector,
            _node: PhantomData,
        }
    }
}

impl<Db, N, F> Query<PageQuery<N, F>> for Marketplace<Db>
where
    Db: Database<
            Select<By<Vec<N>, Selector<F>>>,
            Ok = Vec<N>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<TotalCount, F>>,
            Ok = TotalCount,
            Err = Traced<database::Error>,
        >,
    N: Node,
    F: Clone,
{
    type Ok = Page<N>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        PageQuery { selector, .. }: PageQuery<N, F>,
    ) -> Result<Self::Ok, Self::Err> {
        let arguments = selector.arguments;
        let filter = selector.filter.clone();

        let (nodes, total_count) = future::try_join(
            self.database()
                .execute(Select(By::<Vec<N>, _>::new(selector))),
            self.database()
                .execute(Select(By::<TotalCount, _>::new(filter))),
        )
        .await
        .map_err(tracerr::wrap!())?;

        Ok(Page::new(nodes, total_count, arguments))
    }
}

#[cfg(test)]
mod spec {
    use common::{
        pagination::{Arguments, Selector},
        Handler as _,
    };

    use crate::{
        command::{CreateReview, CreateService},
        domain::{review::Rating, service},
        fixture,
        read::{self, service::RatingSummary},
    };

    use super::{category, review, service as q, subcategory};

    #[tokio::test]
    async fn pages_services_with_filter() {
        let (market, db) = fixture::marketplace();
        let sub = fixture::subcategory(&db);
        for i in 0..25 {
            _ = market
                .execute(CreateService {
                    is_active: Some(i % 5 != 0),
                    ..fixture::create_service(sub.id)
                })
                .await
                .expect("created");
        }

        let page = market
            .execute(q::List::by(Selector {
                arguments: Arguments::new(Some(3), Some(10)),
                filter: read::service::list::Filter::default(),
            }))
            .await
            .expect("listed");
        assert_eq!(page.nodes.len(), 5);
        assert_eq!(page.info.total_count, 25);
        assert_eq!(page.info.total_pages, 3);
        assert!(!page.info.has_next_page);
        assert!(page.info.has_previous_page);
        assert_eq!(
            page.info.start_cursor,
            page.nodes.first().map(|s| s.id.to_string()),
        );

        let active = market
            .execute(q::List::by(Selector {
                arguments: Arguments::default(),
                filter: read::service::list::Filter {
                    is_active: Some(true),
                    ..read::service::list::Filter::default()
                },
            }))
            .await
            .expect("listed");
        assert_eq!(active.info.total_count, 20);
        assert_eq!(active.nodes.len(), 10);
        assert!(active.nodes.iter().all(|s| s.is_active));
        assert!(active.nodes.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn filters_services_by_category() {
        let (market, db) = fixture::marketplace();
        let home = fixture::subcategory(&db);
        let garden = db.add_subcategory(db.add_category("Garden").id, "Lawn");
        _ = market
            .execute(fixture::create_service(home.id))
            .await
            .expect("created");
        let lawn = market
            .execute(CreateService {
                pricing: service::Pricing::Package,
                ..fixture::create_service(garden.id)
            })
            .await
            .expect("created");

        let page = market
            .execute(q::List::by(Selector {
                arguments: Arguments::default(),
                filter: read::service::list::Filter {
                    category_id: Some(garden.category_id),
                    ..read::service::list::Filter::default()
                },
            }))
            .await
            .expect("listed");

        assert_eq!(page.nodes, vec![lawn]);
        assert_eq!(page.info.total_count, 1);
    }

    #[tokio::test]
    async fn empty_page_beyond_last_one() {
        let (market, db) = fixture::marketplace();
        let service = fixture::service(&market, &db).await;

        let page = market
            .execute(q::List::by(Selector {
                arguments: Arguments::new(Some(4), Some(10)),
                filter: read::service::list::Filter {
                    seller_id: Some(service.seller_id),
                    ..read::service::list::Filter::default()
                },
            }))
            .await
            .expect("listed");

        assert!(page.nodes.is_empty());
        assert_eq!(page.info.total_count, 1);
        assert_eq!(page.info.start_cursor, None);
        assert_eq!(page.info.end_cursor, None);
        assert!(!page.info.has_next_page);
        assert!(page.info.has_previous_page);
    }

    #[tokio::test]
    async fn orders_catalog_and_subcategories_by_name() {
        let (market, db) = fixture::marketplace();
        let zoo = db.add_category("Zoo");
        let art = db.add_category("Art");
        let b = db.add_subcategory(art.id, "Brushes");
        let a = db.add_subcategory(art.id, "Acrylic");
        _ = db.add_subcategory(zoo.id, "Feeding");

        let catalog = market
            .execute(category::Catalog::by(()))
            .await
            .expect("catalog");
        assert_eq!(catalog, vec![art.clone(), zoo]);

        let page = market
            .execute(subcategory::List::by(Selector {
                arguments: Arguments::new(None, Some(1)),
                filter: read::subcategory::list::Filter {
                    category_id: art.id,
                },
            }))
            .await
            .expect("listed");
        assert_eq!(page.nodes, vec![a.clone()]);
        assert_eq!(page.info.total_pages, 2);
        assert!(page.info.has_next_page);

        let all = market
            .execute(subcategory::ByCategory::by(art.id))
            .await
            .expect("listed");
        assert_eq!(all, vec![a, b]);
    }

    #[tokio::test]
    async fn summarizes_ratings() {
        let (market, db) = fixture::marketplace();
        let service = fixture::service(&market, &db).await;

        let empty = market
            .execute(q::RatingSummary::by(service.id))
            .await
            .expect("summary");
        assert_eq!(empty, RatingSummary::default());

        for (reviewer, rating) in [("a", 5), ("b", 4)] {
            _ = market
                .execute(CreateReview {
                    service_id: service.id,
                    reviewer_id: fixture::seller_id(reviewer),
                    rating: Rating::new(rating).expect("valid rating"),
                    comment: None,
                })
                .await
                .expect("reviewed");
        }

        let summary = market
            .execute(q::RatingSummary::by(service.id))
            .await
            .expect("summary");
        assert_eq!(summary.count, 2);
        assert!((summary.average - 4.5).abs() < f64::EPSILON);

        let reviews = market
            .execute(review::List::by(Selector {
                arguments: Arguments::default(),
                filter: read::review::list::Filter {
                    service_id: Some(service.id),
                    ..read::review::list::Filter::default()
                },
            }))
            .await
            .expect("listed");
        assert_eq!(reviews.info.total_count, 2);
        assert_eq!(reviews.info.total_pages, 1);
    }
}
