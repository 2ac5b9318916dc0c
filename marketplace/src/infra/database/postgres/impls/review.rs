//! [`Review`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Select},
    unit,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{review, seller, service, Review},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::review::list::{Filter, Selector, TotalCount},
};

/// Builds a [`Review`] out of the provided [`Row`].
fn from_row(row: &Row) -> Review {
    Review {
        id: row.get("id"),
        service_id: row.get("service_id"),
        reviewer_id: row.get("reviewer_id"),
        rating: row.get("rating"),
        comment: row.get("comment"),
        created_at: row.get("created_at"),
    }
}

/// Renders the `WHERE` clause of the provided [`Filter`], pushing its
/// parameters into the provided `ps`.
fn filtering<'p>(
    filter: &'p Filter,
    ps: &mut Vec<&'p (dyn ToSql + Sync)>,
) -> String {
    let Filter {
        service_id,
        reviewer_id,
    } = filter;

    let mut conds = vec![];
    if let Some(id) = service_id {
        ps.push(id);
        conds.push(format!("service_id = ${}::INT4", ps.len()));
    }
    if let Some(id) = reviewer_id {
        ps.push(id);
        conds.push(format!("reviewer_id = ${}::VARCHAR", ps.len()));
    }

    format!(
        "WHERE true {}",
        conds.iter().format_with("", |c, f| f(&format_args!("AND {c} "))),
    )
}

impl<C> Database<Select<By<Option<Review>, review::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Review>, review::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: review::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, service_id, reviewer_id, rating, comment, created_at \
            FROM service_reviews \
            WHERE id = $1::INT4";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Option<Review>, (service::Id, seller::Id)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Review>, (service::Id, seller::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (service_id, reviewer_id) = by.into_inner();

        const SQL: &str = "\
            SELECT id, service_id, reviewer_id, rating, comment, created_at \
            FROM service_reviews \
            WHERE service_id = $1::INT4 \
              AND reviewer_id = $2::VARCHAR";
        Ok(self
            .query_opt(SQL, &[&service_id, &reviewer_id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Review>, service::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Review>, service::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let service_id: service::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, service_id, reviewer_id, rating, comment, created_at \
            FROM service_reviews \
            WHERE service_id = $1::INT4 \
            ORDER BY created_at DESC, id DESC";
        Ok(self
            .query(SQL, &[&service_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Review>, Selector>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Review>, Selector>>,
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
            "SELECT id, service_id, reviewer_id, rating, comment, created_at \
             FROM service_reviews \
             {filtering}\
             ORDER BY created_at DESC, id DESC \
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
             FROM service_reviews \
             {filtering}",
        );
        self.query_opt(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())
            .map(|row| TotalCount::from(row.map_or(0, |r| r.get::<_, i32>(0))))
    }
}

impl<C> Database<Select<By<review::Id, unit::Creation>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = review::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<review::Id, unit::Creation>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT nextval(\
                pg_get_serial_sequence('service_reviews', 'id')\
            )::INT4";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get(0))
    }
}

impl<C> Database<Insert<Review>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(review): Insert<Review>,
    ) -> Result<Self::Ok, Self::Err> {
        let Review {
            id,
            service_id,
            reviewer_id,
            rating,
            comment,
            created_at,
        } = review;

        const SQL: &str = "\
            INSERT INTO service_reviews (\
                id, service_id, reviewer_id, rating, comment, created_at \
            ) VALUES (\
                $1::INT4, $2::INT4, $3::VARCHAR, $4::INT2, $5::VARCHAR, \
                $6::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &service_id,
                &reviewer_id,
                &rating,
                &comment,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Review, review::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Review, review::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: review::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM service_reviews \
            WHERE id = $1::INT4";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected > 0)
    }
}
