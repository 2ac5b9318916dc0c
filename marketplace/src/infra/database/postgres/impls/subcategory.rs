//! [`Subcategory`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{category, subcategory, Subcategory},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::subcategory::{
        list::{Filter, Selector, TotalCount},
        ServiceCount,
    },
};

/// Builds a [`Subcategory`] out of the provided [`Row`].
fn from_row(row: &Row) -> Subcategory {
    Subcategory {
        id: row.get("id"),
        name: row.get("name"),
        category_id: row.get("category_id"),
    }
}

impl<C> Database<Select<By<Option<Subcategory>, subcategory::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Subcategory>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Subcategory>, subcategory::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: subcategory::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, category_id \
            FROM service_subcategories \
            WHERE id = $1::INT4";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Subcategory>, category::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Subcategory>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Subcategory>, category::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let category_id: category::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, category_id \
            FROM service_subcategories \
            WHERE category_id = $1::INT4 \
            ORDER BY name ASC, id ASC";
        Ok(self
            .query(SQL, &[&category_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Subcategory>, Selector>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Subcategory>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Subcategory>, Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Selector {
            arguments,
            filter: Filter { category_id },
        } = by.into_inner();
        let offset = arguments.offset();

        const SQL: &str = "\
            SELECT id, name, category_id \
            FROM service_subcategories \
            WHERE category_id = $1::INT4 \
            ORDER BY name ASC, id ASC \
            OFFSET $2::INT8 \
            LIMIT $3::INT8";
        Ok(self
            .query(SQL, &[&category_id, &offset.skip, &offset.take])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<TotalCount, Filter>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<TotalCount, Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Filter { category_id } = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM service_subcategories \
            WHERE category_id = $1::INT4";
        self.query_opt(SQL, &[&category_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| TotalCount::from(row.map_or(0, |r| r.get::<_, i32>(0))))
    }
}

impl<C> Database<Select<By<ServiceCount, subcategory::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ServiceCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<ServiceCount, subcategory::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: subcategory::Id = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM services \
            WHERE subcategory_id = $1::INT4";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| ServiceCount(row.map_or(0, |r| r.get::<_, i32>(0))))
    }
}
