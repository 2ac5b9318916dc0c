//! [`Service`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Lock, Select, Update},
    unit,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{service, Service},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::service::{
        list::{Filter, Selector, TotalCount},
        RatingSummary,
    },
};

/// Columns of a [`Service`] row read by [`from_row()`].
const COLUMNS: &str = "\
    id, name, description, seller_id, subcategory_id, \
    pricing, base_price, price_range, duration, is_active, \
    images, tags, \
    created_at, updated_at";

/// Builds a [`Service`] out of the provided [`Row`].
fn from_row(row: &Row) -> Service {
    Service {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        seller_id: row.get("seller_id"),
        subcategory_id: row.get("subcategory_id"),
        pricing: row.get("pricing"),
        base_price: row.get("base_price"),
        price_range: row.get("price_range"),
        duration: row.get("duration"),
        is_active: row.get("is_active"),
        images: row.get("images"),
        tags: row.get("tags"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Renders the `WHERE` clause of the provided [`Filter`], pushing its
/// parameters into the provided `ps`.
fn filtering<'p>(
    filter: &'p Filter,
    ps: &mut Vec<&'p (dyn ToSql + Sync)>,
) -> String {
    let Filter {
        seller_id,
        subcategory_id,
        category_id,
        pricing,
        is_active,
    } = filter;

    let mut conds = vec![];
    if let Some(id) = seller_id {
        ps.push(id);
        conds.push(format!("seller_id = ${}::VARCHAR", ps.len()));
    }
    if let Some(id) = subcategory_id {
        ps.push(id);
        conds.push(format!("subcategory_id = ${}::INT4", ps.len()));
    }
    if let Some(id) = category_id {
        ps.push(id);
        conds.push(format!(
            "subcategory_id IN (\
                SELECT id FROM service_subcategories \
                WHERE category_id = ${}::INT4\
            )",
            ps.len(),
        ));
    }
    if let Some(pricing) = pricing {
        ps.push(pricing);
        conds.push(format!("pricing = ${}::INT2", ps.len()));
    }
    if let Some(active) = is_active {
        ps.push(active);
        conds.push(format!("is_active = ${}::BOOL", ps.len()));
    }

    format!(
        "WHERE true {}",
        conds.iter().format_with("", |c, f| f(&format_args!("AND {c} "))),
    )
}

impl<C> Database<Select<By<Option<Service>, service::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Service>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Service>, service::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: service::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM services \
             WHERE id = $1::INT4",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Service>, Selector>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Service>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Service>, Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Selector { arguments, filter } = by.into_inner();
        let offset = arguments.offset();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let filtering = filtering(&filter, &mut ps);
        ps.push(&offset.skip);
        let skip_idx = ps.len();
        ps.push(&offset.take);
        let take_idx = ps.len();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM services \
             {filtering}\
             ORDER BY id ASC \
             OFFSET ${skip_idx}::INT8 \
             LIMIT ${take_idx}::INT8",
        );
        Ok(self
            .query(&sql, ps.as_slice())
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
        let filter = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let filtering = filtering(&filter, &mut ps);

        let sql = format!(
            "SELECT COUNT(*)::INT4 \
             FROM services \
             {filtering}",
        );
        self.query_opt(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())
            .map(|row| TotalCount::from(row.map_or(0, |r| r.get::<_, i32>(0))))
    }
}

impl<C> Database<Select<By<RatingSummary, service::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = RatingSummary;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<RatingSummary, service::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: service::Id = by.into_inner();

        const SQL: &str = "\
            SELECT COALESCE(AVG(rating), 0)::FLOAT8 AS average, \
                   COUNT(*)::INT4 AS count \
            FROM service_reviews \
            WHERE service_id = $1::INT4";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map_or_else(RatingSummary::default, |row| RatingSummary {
                average: row.get("average"),
                count: row.get("count"),
            }))
    }
}

impl<C> Database<Select<By<service::Id, unit::Creation>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = service::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<service::Id, unit::Creation>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT nextval(pg_get_serial_sequence('services', 'id'))::INT4";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get(0))
    }
}

impl<C> Database<Insert<Service>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Service>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(service): Insert<Service>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(service)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Service>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(service): Update<Service>,
    ) -> Result<Self::Ok, Self::Err> {
        let Service {
            id,
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
            created_at,
            updated_at,
        } = service;

        const SQL: &str = "\
            INSERT INTO services (\
                id, name, description, seller_id, subcategory_id, \
                pricing, base_price, price_range, duration, is_active, \
                images, tags, \
                created_at, updated_at \
            ) VALUES (\
                $1::INT4, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, $5::INT4, \
                $6::INT2, $7::NUMERIC, $8::VARCHAR, $9::INT4, $10::BOOL, \
                $11::VARCHAR[], $12::VARCHAR[], \
                $13::TIMESTAMPTZ, $14::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                description = EXCLUDED.description, \
                seller_id = EXCLUDED.seller_id, \
                subcategory_id = EXCLUDED.subcategory_id, \
                pricing = EXCLUDED.pricing, \
                base_price = EXCLUDED.base_price, \
                price_range = EXCLUDED.price_range, \
                duration = EXCLUDED.duration, \
                is_active = EXCLUDED.is_active, \
                images = EXCLUDED.images, \
                tags = EXCLUDED.tags, \
                created_at = EXCLUDED.created_at, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &description,
                &seller_id,
                &subcategory_id,
                &pricing,
                &base_price,
                &price_range,
                &duration,
                &is_active,
                &images,
                &tags,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Service, service::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Service, service::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: service::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM services \
            WHERE id = $1::INT4 \
            FOR UPDATE";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Service, service::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Service, service::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: service::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM services \
            WHERE id = $1::INT4";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected > 0)
    }
}
