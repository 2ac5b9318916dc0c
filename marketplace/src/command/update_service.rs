//! [`Command`] for updating a [`Service`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{service, subcategory, Service, Subcategory},
    infra::{database, Database},
    Marketplace,
};

use super::Command;

/// [`Command`] for updating a [`Service`].
///
/// Absent fields are left unchanged.
#[derive(Clone, Debug)]
pub struct UpdateService {
    /// ID of the [`Service`] to be updated.
    pub id: service::Id,

    /// New [`service::Name`] of the [`Service`].
    pub name: Option<service::Name>,

    /// New [`service::Description`] of the [`Service`].
    pub description: Option<service::Description>,

    /// ID of the new [`Subcategory`] of the [`Service`].
    pub subcategory_id: Option<subcategory::Id>,

    /// New [`service::Pricing`] of the [`Service`].
    pub pricing: Option<service::Pricing>,

    /// New base [`service::Price`] of the [`Service`].
    pub base_price: Option<service::Price>,

    /// New [`service::PriceRange`] of the [`Service`].
    pub price_range: Option<service::PriceRange>,

    /// New duration of the [`Service`].
    pub duration: Option<service::Minutes>,

    /// New activity of the [`Service`].
    pub is_active: Option<bool>,

    /// New [`service::Image`]s of the [`Service`].
    pub images: Option<Vec<service::Image>>,

    /// New [`service::Tag`]s of the [`Service`].
    pub tags: Option<Vec<service::Tag>>,
}

impl UpdateService {
    /// Creates a new [`UpdateService`] [`Command`] changing nothing in the
    /// [`Service`] with the provided ID.
    #[must_use]
    pub fn new(id: service::Id) -> Self {
        Self {
            id,
            name: None,
            description: None,
            subcategory_id: None,
            pricing: None,
            base_price: None,
            price_range: None,
            duration: None,
            is_active: None,
            images: None,
            tags: None,
        }
    }
}

impl<Db> Command<UpdateService> for Marketplace<Db>
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
            Select<By<Option<Subcategory>, subcategory::Id>>,
            Ok = Option<Subcategory>,
            Err = Traced<database::Error>,
        > + Database<Update<Service>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Service;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateService) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateService {
            id,
            name,
            description,
            subcategory_id,
            pricing,
            base_price,
            price_range,
            duration,
            is_active,
            images,
            tags,
        } = cmd;

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

        if let Some(subcategory_id) = subcategory_id {
            tx.execute(Select(By::<Option<Subcategory>, _>::new(
                subcategory_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SubcategoryNotExists(subcategory_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;
            service.subcategory_id = subcategory_id;
        }
        if let Some(name) = name {
            service.name = name;
        }
        if let Some(description) = description {
            service.description = Some(description);
        }
        if let Some(pricing) = pricing {
            service.pricing = pricing;
        }
        if let Some(price) = base_price {
            service.base_price = Some(price);
        }
        if let Some(range) = price_range {
            service.price_range = Some(range);
        }
        if let Some(duration) = duration {
            service.duration = Some(duration);
        }
        if let Some(active) = is_active {
            service.is_active = active;
        }
        if let Some(images) = images {
            service.images = images;
        }
        if let Some(tags) = tags {
            service.tags = tags;
        }
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

/// Error of [`UpdateService`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Service`] with the provided ID does not exist.
    #[display("`Service(id: {_0})` does not exist")]
    ServiceNotExists(#[error(not(source))] service::Id),

    /// [`Subcategory`] with the provided ID does not exist.
    #[display("`Subcategory(id: {_0})` does not exist")]
    SubcategoryNotExists(#[error(not(source))] subcategory::Id),
}

#[cfg(test)]
mod spec {
    use crate::{domain::service, fixture, Command as _};

    use super::{ExecutionError, UpdateService};

    #[tokio::test]
    async fn updates_only_provided_fields() {
        let (market, db) = fixture::marketplace();
        let original = fixture::service(&market, &db).await;

        let updated = market
            .execute(UpdateService {
                name: service::Name::new("Drain cleaning"),
                is_active: Some(false),
                ..UpdateService::new(original.id)
            })
            .await
            .expect("updated");

        assert_eq!(updated.name.as_ref(), "Drain cleaning");
        assert!(!updated.is_active);
        assert_eq!(updated.pricing, original.pricing);
        assert_eq!(updated.base_price, original.base_price);
        assert_eq!(updated.tags, original.tags);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
        assert_eq!(
            fixture::service_by_id(&market, original.id).await,
            Some(updated),
        );
    }

    #[tokio::test]
    async fn moves_into_existing_subcategory_only() {
        let (market, db) = fixture::marketplace();
        let original = fixture::service(&market, &db).await;
        let target = db.add_subcategory(
            db.add_category("Garden").id,
            "Lawn mowing",
        );

        let moved = market
            .execute(UpdateService {
                subcategory_id: Some(target.id),
                ..UpdateService::new(original.id)
            })
            .await
            .expect("moved");
        assert_eq!(moved.subcategory_id, target.id);

        let err = market
            .execute(UpdateService {
                subcategory_id: Some(999.into()),
                ..UpdateService::new(original.id)
            })
            .await
            .expect_err("no subcategory");
        assert!(matches!(
            err.as_ref(),
            ExecutionError::SubcategoryNotExists(_),
        ));
    }

    #[tokio::test]
    async fn fails_on_missing_service() {
        let (market, _) = fixture::marketplace();

        let err = market
            .execute(UpdateService::new(7.into()))
            .await
            .expect_err("no service");

        assert!(matches!(err.as_ref(), ExecutionError::ServiceNotExists(_)));
    }
}
