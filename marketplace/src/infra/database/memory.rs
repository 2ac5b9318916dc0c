//! In-memory [`Database`] used in tests.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use common::{
    operations::{
        By, Commit, Delete, Insert, Lock, Select, Transact, Update,
    },
    pagination::{Offset, TotalCount},
    unit,
};
use tracerr::Traced;

use crate::{
    domain::{
        category, quotation, review, seller, service, subcategory, Category,
        Quotation, Review, Service, Subcategory,
    },
    infra::{database, Database},
    read,
};

/// In-memory [`Database`].
///
/// Clones share the same state, and transactions are applied immediately.
#[derive(Clone, Debug, Default)]
pub(crate) struct Memory {
    /// Shared [`State`] of this [`Memory`].
    state: Arc<Mutex<State>>,
}

/// Rows stored in a [`Memory`].
#[derive(Debug, Default)]
struct State {
    /// Stored [`Category`]s.
    categories: BTreeMap<category::Id, Category>,

    /// Stored [`Subcategory`]s.
    subcategories: BTreeMap<subcategory::Id, Subcategory>,

    /// Stored [`Service`]s.
    services: BTreeMap<service::Id, Service>,

    /// Stored [`Quotation`]s.
    quotations: BTreeMap<quotation::Id, Quotation>,

    /// Stored [`Review`]s.
    reviews: BTreeMap<review::Id, Review>,

    /// Last allocated ID.
    last_id: i32,
}

impl State {
    /// Allocates a new ID.
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

impl Memory {
    /// Locks the [`State`] of this [`Memory`].
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("poisoned")
    }

    /// Stores a new [`Category`] with the provided `name`.
    pub(crate) fn add_category(&self, name: &str) -> Category {
        let mut state = self.state();
        let category = Category {
            id: state.next_id().into(),
            name: category::Name::new(name).expect("valid name"),
        };
        _ = state.categories.insert(category.id, category.clone());
        category
    }

    /// Stores a new [`Subcategory`] with the provided `name` in the provided
    /// [`Category`].
    pub(crate) fn add_subcategory(
        &self,
        category_id: category::Id,
        name: &str,
    ) -> Subcategory {
        let mut state = self.state();
        let subcategory = Subcategory {
            id: state.next_id().into(),
            name: subcategory::Name::new(name).expect("valid name"),
            category_id,
        };
        _ = state
            .subcategories
            .insert(subcategory.id, subcategory.clone());
        subcategory
    }

    /// Returns all the stored [`Quotation`]s.
    pub(crate) fn quotations(&self) -> Vec<Quotation> {
        self.state().quotations.values().cloned().collect()
    }
}

/// Takes the rows of the provided [`Offset`] out of the provided `rows`.
fn paginate<T>(rows: impl IntoIterator<Item = T>, offset: Offset) -> Vec<T> {
    rows.into_iter()
        .skip(usize::try_from(offset.skip).unwrap_or(usize::MAX))
        .take(usize::try_from(offset.take).unwrap_or(0))
        .collect()
}

/// Counts the provided `rows` as a [`TotalCount`].
fn count<T>(rows: impl IntoIterator<Item = T>) -> TotalCount {
    TotalCount(i32::try_from(rows.into_iter().count()).unwrap_or(i32::MAX))
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl<T, B> Database<Lock<By<T, B>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Lock<By<T, B>>) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Option<Category>, category::Id>>> for Memory {
    type Ok = Option<Category>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Category>, category::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().categories.get(by.inner()).cloned())
    }
}

impl Database<Select<By<Vec<Category>, ()>>> for Memory {
    type Ok = Vec<Category>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Category>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut categories =
            self.state().categories.values().cloned().collect::<Vec<_>>();
        categories.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        Ok(categories)
    }
}

impl Database<Select<By<Option<Subcategory>, subcategory::Id>>> for Memory {
    type Ok = Option<Subcategory>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Subcategory>, subcategory::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().subcategories.get(by.inner()).cloned())
    }
}

impl Database<Select<By<Vec<Subcategory>, category::Id>>> for Memory {
    type Ok = Vec<Subcategory>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Subcategory>, category::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let category_id = by.into_inner();
        let mut subcategories = self
            .state()
            .subcategories
            .values()
            .filter(|s| s.category_id == category_id)
            .cloned()
            .collect::<Vec<_>>();
        subcategories.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        Ok(subcategories)
    }
}

impl Database<Select<By<Vec<Subcategory>, read::subcategory::list::Selector>>>
    for Memory
{
    type Ok = Vec<Subcategory>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Subcategory>, read::subcategory::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let selector = by.into_inner();
        let all = self
            .execute(Select(By::<Vec<Subcategory>, _>::new(
                selector.filter.category_id,
            )))
            .await?;
        Ok(paginate(all, selector.arguments.offset()))
    }
}

impl Database<Select<By<TotalCount, read::subcategory::list::Filter>>>
    for Memory
{
    type Ok = TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<TotalCount, read::subcategory::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let category_id = by.into_inner().category_id;
        Ok(count(
            self.state()
                .subcategories
                .values()
                .filter(|s| s.category_id == category_id),
        ))
    }
}

impl Database<Select<By<read::subcategory::ServiceCount, subcategory::Id>>>
    for Memory
{
    type Ok = read::subcategory::ServiceCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::subcategory::ServiceCount, subcategory::Id>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let TotalCount(n) = count(
            self.state()
                .services
                .values()
                .filter(|s| s.subcategory_id == id),
        );
        Ok(read::subcategory::ServiceCount(n))
    }
}

/// Checks whether the provided [`Service`] matches the provided
/// [`read::service::list::Filter`].
fn service_matches(
    state: &State,
    filter: &read::service::list::Filter,
    service: &Service,
) -> bool {
    let read::service::list::Filter {
        seller_id,
        subcategory_id,
        category_id,
        pricing,
        is_active,
    } = filter;

    seller_id.as_ref().map_or(true, |id| *id == service.seller_id)
        && subcategory_id.map_or(true, |id| id == service.subcategory_id)
        && category_id.map_or(true, |id| {
            state
                .subcategories
                .get(&service.subcategory_id)
                .is_some_and(|s| s.category_id == id)
        })
        && pricing.map_or(true, |p| p == service.pricing)
        && is_active.map_or(true, |a| a == service.is_active)
}

impl Database<Select<By<Option<Service>, service::Id>>> for Memory {
    type Ok = Option<Service>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Service>, service::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().services.get(by.inner()).cloned())
    }
}

impl Database<Select<By<Vec<Service>, read::service::list::Selector>>>
    for Memory
{
    type Ok = Vec<Service>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Service>, read::service::list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let selector = by.into_inner();
        let state = self.state();
        Ok(paginate(
            state
                .services
                .values()
                .filter(|s| service_matches(&state, &selector.filter, s))
                .cloned(),
            selector.arguments.offset(),
        ))
    }
}

impl Database<Select<By<TotalCount, read::service::list::Filter>>> for Memory {
    type Ok = TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<TotalCount, read::service::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        let state = self.state();
        Ok(count(
            state
                .services
                .values()
                .filter(|s| service_matches(&state, &filter, s)),
        ))
    }
}

impl Database<Select<By<read::service::RatingSummary, service::Id>>>
    for Memory
{
    type Ok = read::service::RatingSummary;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::service::RatingSummary, service::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let ratings = self
            .state()
            .reviews
            .values()
            .filter(|r| r.service_id == id)
            .map(|r| f64::from(i32::from(r.rating)))
            .collect::<Vec<_>>();
        if ratings.is_empty() {
            return Ok(read::service::RatingSummary::default());
        }
        let TotalCount(count) = count(&ratings);
        Ok(read::service::RatingSummary {
            average: ratings.iter().sum::<f64>() / f64::from(count),
            count,
        })
    }
}

impl Database<Select<By<service::Id, unit::Creation>>> for Memory {
    type Ok = service::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<service::Id, unit::Creation>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().next_id().into())
    }
}

impl Database<Insert<Service>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(service): Insert<Service>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(service)).await
    }
}

impl Database<Update<Service>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(service): Update<Service>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.state().services.insert(service.id, service);
        Ok(())
    }
}

impl Database<Delete<By<Service, service::Id>>> for Memory {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Service, service::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let mut state = self.state();
        state.quotations.retain(|_, q| q.service_id != id);
        state.reviews.retain(|_, r| r.service_id != id);
        Ok(state.services.remove(&id).is_some())
    }
}

/// Checks whether the provided [`Quotation`] matches the provided
/// [`read::quotation::list::Filter`].
fn quotation_matches(
    filter: &read::quotation::list::Filter,
    quotation: &Quotation,
) -> bool {
    let read::quotation::list::Filter {
        client_id,
        provider_id,
        service_id,
        status,
    } = filter;

    client_id.as_ref().map_or(true, |id| *id == quotation.client_id)
        && provider_id
            .as_ref()
            .map_or(true, |id| *id == quotation.provider_id)
        && service_id.map_or(true, |id| id == quotation.service_id)
        && status.map_or(true, |s| s == quotation.status)
}

impl Database<Select<By<Option<Quotation>, quotation::Id>>> for Memory {
    type Ok = Option<Quotation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Quotation>, quotation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().quotations.get(by.inner()).cloned())
    }
}

impl Database<Select<By<Vec<Quotation>, service::Id>>> for Memory {
    type Ok = Vec<Quotation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Quotation>, service::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .state()
            .quotations
            .values()
            .filter(|q| q.service_id == id)
            .cloned()
            .collect())
    }
}

impl Database<Select<By<Vec<Quotation>, read::quotation::list::Selector>>>
    for Memory
{
    type Ok = Vec<Quotation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Quotation>, read::quotation::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let selector = by.into_inner();
        Ok(paginate(
            self.state()
                .quotations
                .values()
                .filter(|q| quotation_matches(&selector.filter, q))
                .cloned(),
            selector.arguments.offset(),
        ))
    }
}

impl Database<Select<By<TotalCount, read::quotation::list::Filter>>>
    for Memory
{
    type Ok = TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<TotalCount, read::quotation::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        Ok(count(
            self.state()
                .quotations
                .values()
                .filter(|q| quotation_matches(&filter, q)),
        ))
    }
}

impl Database<Select<By<quotation::Id, unit::Creation>>> for Memory {
    type Ok = quotation::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<quotation::Id, unit::Creation>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().next_id().into())
    }
}

impl Database<Insert<Quotation>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(quotation): Insert<Quotation>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(quotation)).await
    }
}

impl Database<Update<Quotation>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(quotation): Update<Quotation>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.state().quotations.insert(quotation.id, quotation);
        Ok(())
    }
}

impl Database<Update<By<read::quotation::Expired, quotation::ExpirationDateTime>>>
    for Memory
{
    type Ok = read::quotation::Expired;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<
            By<read::quotation::Expired, quotation::ExpirationDateTime>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let deadline = by.into_inner();
        let mut expired = 0;
        for q in self.state().quotations.values_mut() {
            if q.status == quotation::Status::Pending
                && q.expires_at.is_some_and(|at| at <= deadline)
            {
                q.status = quotation::Status::Expired;
                q.updated_at = deadline.coerce();
                expired += 1;
            }
        }
        Ok(read::quotation::Expired(expired))
    }
}

impl Database<Delete<By<Quotation, quotation::Id>>> for Memory {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Quotation, quotation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().quotations.remove(by.inner()).is_some())
    }
}

/// Checks whether the provided [`Review`] matches the provided
/// [`read::review::list::Filter`].
fn review_matches(filter: &read::review::list::Filter, review: &Review) -> bool {
    let read::review::list::Filter {
        service_id,
        reviewer_id,
    } = filter;

    service_id.map_or(true, |id| id == review.service_id)
        && reviewer_id
            .as_ref()
            .map_or(true, |id| *id == review.reviewer_id)
}

/// Orders the provided [`Review`]s newest first.
fn newest_first(mut reviews: Vec<Review>) -> Vec<Review> {
    reviews.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
    reviews
}

impl Database<Select<By<Option<Review>, review::Id>>> for Memory {
    type Ok = Option<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Review>, review::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().reviews.get(by.inner()).cloned())
    }
}

impl Database<Select<By<Option<Review>, (service::Id, seller::Id)>>>
    for Memory
{
    type Ok = Option<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Review>, (service::Id, seller::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (service_id, reviewer_id) = by.into_inner();
        Ok(self
            .state()
            .reviews
            .values()
            .find(|r| r.service_id == service_id && r.reviewer_id == reviewer_id)
            .cloned())
    }
}

impl Database<Select<By<Vec<Review>, service::Id>>> for Memory {
    type Ok = Vec<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Review>, service::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(newest_first(
            self.state()
                .reviews
                .values()
                .filter(|r| r.service_id == id)
                .cloned()
                .collect(),
        ))
    }
}

impl Database<Select<By<Vec<Review>, read::review::list::Selector>>>
    for Memory
{
    type Ok = Vec<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Review>, read::review::list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let selector = by.into_inner();
        let reviews = newest_first(
            self.state()
                .reviews
                .values()
                .filter(|r| review_matches(&selector.filter, r))
                .cloned()
                .collect(),
        );
        Ok(paginate(reviews, selector.arguments.offset()))
    }
}

impl Database<Select<By<TotalCount, read::review::list::Filter>>> for Memory {
    type Ok = TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<TotalCount, read::review::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        Ok(count(
            self.state()
                .reviews
                .values()
                .filter(|r| review_matches(&filter, r)),
        ))
    }
}

impl Database<Select<By<review::Id, unit::Creation>>> for Memory {
    type Ok = review::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<review::Id, unit::Creation>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().next_id().into())
    }
}

impl Database<Insert<Review>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(review): Insert<Review>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.state().reviews.insert(review.id, review);
        Ok(())
    }
}

impl Database<Delete<By<Review, review::Id>>> for Memory {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Review, review::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().reviews.remove(by.inner()).is_some())
    }
}
