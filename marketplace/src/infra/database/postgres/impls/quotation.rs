//! [`Quotation`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Lock, Select, Update},
    unit,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{quotation, service, Quotation},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::quotation::{
        list::{Filter, Selector, TotalCount},
        Expired,
    },
};

/// Columns of a [`Quotation`] row read by [`from_row()`].
const COLUMNS: &str = "\
    id, service_id, client_id, provider_id, \
    title, description, \
    estimated_price, final_price, estimated_duration, \
    status, client_notes, provider_notes, attachments, \
    created_at, updated_at, expires_at, accepted_at, completed_at";

/// Builds a [`Quotation`] out of the provided [`Row`].
fn from_row(row: &Row) -> Quotation {
    Quotation {
        id: row.get("id"),
        service_id: row.get("service_id"),
        client_id: row.get("client_id"),
        provider_id: row.get("provider_id"),
        title: row.get("title"),
        description: row.get("description"),
        estimated_price: row.get("estimated_price"),
        final_price: row.get("final_price"),
        estimated_duration: row.get("estimated_duration"),
        status: row.get("status"),
        client_notes: row.get("client_notes"),
        provider_notes: row.get("provider_notes"),
        attachments: row.get("attachments"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        expires_at: row.get("expires_at"),
        accepted_at: row.get("accepted_at"),
        completed_at: row.get("completed_at"),
    }
}

/// Renders the `WHERE` clause of the provided [`Filter`], pushing its
/// parameters into the provided `ps`.
fn filtering<'p>(
    filter: &'p Filter,
    ps: &mut Vec<&'p (dyn ToSql + Sync)>,
) -> String {
    let Filter {
        client_id,
        provider_id,
        service_id,
        status,
    } = filter;

    let mut conds = vec![];
    if let Some(id) = client_id {
        ps.push(id);
        conds.push(format!("client_id = ${}::VARCHAR", ps.len()));
    }
    if let Some(id) = provider_id {
        ps.push(id);
        conds.push(format!("provider_id = ${}::VARCHAR", ps.len()));
    }
    if let Some(id) = service_id {
        ps.push(id);
        conds.push(format!("service_id = ${}::INT4", ps.len()));
    }
    if let Some(status) = status {
        ps.push(status);
        conds.push(format!("status = ${}::INT2", ps.len()));
    }

    format!(
        "WHERE true {}",
        conds.iter().format_with("", |c, f| f(&format_args!("AND {c} "))),
    )
}

impl<C> Database<Select<By<Option<Quotation>, quotation::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Quotation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Quotation>, quotation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: quotation::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM quotations \
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

impl<C> Database<Select<By<Vec<Quotation>, service::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Quotation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Quotation>, service::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let service_id: service::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM quotations \
             WHERE service_id = $1::INT4 \
             ORDER BY id ASC",
        );
        Ok(self
            .query(&sql, &[&service_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Quotation>, Selector>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Quotation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Quotation>, Selector>>,
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
             FROM quotations \
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
             FROM quotations \
             {filtering}",
        );
        self.query_opt(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())
            .map(|row| TotalCount::from(row.map_or(0, |r| r.get::<_, i32>(0))))
    }
}

impl<C> Database<Select<By<quotation::Id, unit::Creation>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = quotation::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<quotation::Id, unit::Creation>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT nextval(pg_get_serial_sequence('quotations', 'id'))::INT4";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get(0))
    }
}

impl<C> Database<Insert<Quotation>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Quotation>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(quotation): Insert<Quotation>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(quotation))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Quotation>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(quotation): Update<Quotation>,
    ) -> Result<Self::Ok, Self::Err> {
        let Quotation {
            id,
            service_id,
            client_id,
            provider_id,
            title,
            description,
            estimated_price,
            final_price,
            estimated_duration,
            status,
            client_notes,
            provider_notes,
            attachments,
            created_at,
            updated_at,
            expires_at,
            accepted_at,
            completed_at,
        } = quotation;

        const SQL: &str = "\
            INSERT INTO quotations (\
                id, service_id, client_id, provider_id, \
                title, description, \
                estimated_price, final_price, estimated_duration, \
                status, client_notes, provider_notes, attachments, \
                created_at, updated_at, \
                expires_at, accepted_at, completed_at \
            ) VALUES (\
                $1::INT4, $2::INT4, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, $6::VARCHAR, \
                $7::NUMERIC, $8::NUMERIC, $9::INT4, \
                $10::INT2, $11::VARCHAR, $12::VARCHAR, $13::VARCHAR[], \
                $14::TIMESTAMPTZ, $15::TIMESTAMPTZ, \
                $16::TIMESTAMPTZ, $17::TIMESTAMPTZ, $18::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET service_id = EXCLUDED.service_id, \
                client_id = EXCLUDED.client_id, \
                provider_id = EXCLUDED.provider_id, \
                title = EXCLUDED.title, \
                description = EXCLUDED.description, \
                estimated_price = EXCLUDED.estimated_price, \
                final_price = EXCLUDED.final_price, \
                estimated_duration = EXCLUDED.estimated_duration, \
                status = EXCLUDED.status, \
                client_notes = EXCLUDED.client_notes, \
                provider_notes = EXCLUDED.provider_notes, \
                attachments = EXCLUDED.attachments, \
                created_at = EXCLUDED.created_at, \
                updated_at = EXCLUDED.updated_at, \
                expires_at = EXCLUDED.expires_at, \
                accepted_at = EXCLUDED.accepted_at, \
                completed_at = EXCLUDED.completed_at";
        self.exec(
            SQL,
            &[
                &id,
                &service_id,
                &client_id,
                &provider_id,
                &title,
                &description,
                &estimated_price,
                &final_price,
                &estimated_duration,
                &status,
                &client_notes,
                &provider_notes,
                &attachments,
                &created_at,
                &updated_at,
                &expires_at,
                &accepted_at,
                &completed_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<By<Expired, quotation::ExpirationDateTime>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Expired;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Expired, quotation::ExpirationDateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let deadline = by.into_inner();
        let updated_at: quotation::ModificationDateTime = deadline.coerce();

        const SQL: &str = "\
            UPDATE quotations \
            SET status = $1::INT2, \
                updated_at = $2::TIMESTAMPTZ \
            WHERE status = $3::INT2 \
              AND expires_at <= $4::TIMESTAMPTZ";
        self.exec(
            SQL,
            &[
                &quotation::Status::Expired,
                &updated_at,
                &quotation::Status::Pending,
                &deadline,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(Expired)
    }
}

impl<C> Database<Lock<By<Quotation, quotation::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Quotation, quotation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: quotation::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM quotations \
            WHERE id = $1::INT4 \
            FOR UPDATE";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Quotation, quotation::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Quotation, quotation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: quotation::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM quotations \
            WHERE id = $1::INT4";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected > 0)
    }
}
