//! [`Command`] for creating a new [`Service`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    unit, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{seller, service, subcategory, Service, Subcategory},
    infra::{database, Database},
    Marketplace,
};

use super::Command;

/// [`Command`] for creating a new [`Service`].
#[derive(Clone, Debug)]
pub struct CreateService {
    /// [`service::Name`] of a new [`Service`].
    pub name: service::Name,

    /// [`service::Description`] of a new [`Service`].
    pub description: Option<service::Description>,

    /// ID of the seller offering a new [`Service`].
    pub seller_id: seller::Id,

    /// ID of the [`Subcategory`] to list a new [`Service`] under.
    pub subcategory_id: subcategory::Id,

    /// [`service::Pricing`] of a new [`Service`].
    pub pricing: service::Pricing,

    /// Base [`service::Price`] of a new [`Service`].
    pub base_price: Option<service::Price>,

    /// [`service::PriceRange`] of a new [`Service`].
    pub price_range: Option<service::PriceRange>,

    /// Usual duration of a new [`Service`].
    pub duration: Option<service::Minutes>,

    /// Indicator whether a new [`Service`] is offered right away.
    ///
    /// [`None`] means `true`.
    pub is_active: Option<bool>,

    /// [`service::Image`]s of a new [`Service`].
    pub images: Vec<service::Image>,

    /// [`service::Tag`]s of a new [`Service`].
    pub tags: Vec<service::Tag>,
}

impl<Db> Command<CreateService> for Marketplace<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Subcategory>, subcategory::Id>>,
            Ok = Option<Subcategory>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<service::Id, unit::Creation>>,
            Ok = service::Id,
            Err = Traced<database::Error>,
        > + Database<Insert<Service>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Service;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateService) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateService {
            name,
            description,
            seller_id,
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

        tx.execute(Select(By::<Option<Subcategory>, _>::new(subcategory_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SubcategoryNotExists(subcategory_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let id = tx
            .execute(Select(By::<service::Id, _>::new(unit::Creation)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let now = DateTime::now();
        let service = Service {
            id,
            name,
            description,
            seller_id,
            subcategory_id,
            pricing,
            base_price,
            price_range,
            duration,
            is_active: is_active.unwrap_or(true),
            images,
            tags,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        tx.execute(Insert(service.clone()))
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

/// Error of [`CreateService`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Subcategory`] with the provided ID does not exist.
    #[display("`Subcategory(id: {_0})` does not exist")]
    SubcategoryNotExists(#[error(not(source))] subcategory::Id),
}
