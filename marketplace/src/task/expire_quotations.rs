//! [`ExpireQuotations`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Perform, Start, Update};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Quotation;
use crate::{
    domain::quotation,
    infra::{database, Database},
    read::quotation::Expired,
    Marketplace,
};

use super::Task;

/// Configuration for [`ExpireQuotations`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between [`Quotation`]s expiration sweeps.
    pub interval: time::Duration,
}

/// [`Task`] for expiring pending [`Quotation`]s whose expiration has passed.
#[derive(Clone, Copy, Debug)]
pub struct ExpireQuotations<M> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Marketplace`] instance.
    marketplace: M,
}

impl<Db> Task<Start<By<ExpireQuotations<Self>, Config>>> for Marketplace<Db>
where
    ExpireQuotations<Marketplace<Db>>:
        Task<Perform<()>, Ok = Expired, Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<ExpireQuotations<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = ExpireQuotations {
            config,
            marketplace: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(Expired(n)) => {
                    log::debug!(
                        "`task::ExpireQuotations` expired {n} quotations",
                    );
                }
                Err(e) => {
                    log::error!("`task::ExpireQuotations` failed: {e}");
                }
            }
        }
    }
}

impl<Db> Task<Perform<()>> for ExpireQuotations<Marketplace<Db>>
where
    Db: Database<
        Update<By<Expired, quotation::ExpirationDateTime>>,
        Ok = Expired,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Expired;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let deadline = quotation::ExpirationDateTime::now();
        self.marketplace
            .database()
            .execute(Update(By::new(deadline)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`ExpireQuotations`] execution.
pub type ExecutionError = Traced<database::Error>;
