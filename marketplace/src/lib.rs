//! Business logic of the services marketplace.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
#[cfg(test)]
mod fixture;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use std::error::Error;

use common::operations::{By, Start};
use derive_more::Debug;

#[cfg(doc)]
use infra::Database;

pub use self::{command::Command, query::Query, task::Task};

/// [`Marketplace`] configuration.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// [`task::ExpireQuotations`] configuration.
    pub expire_quotations: task::expire_quotations::Config,
}

/// Services marketplace.
#[derive(Clone, Debug)]
pub struct Marketplace<Db> {
    /// Configuration of this [`Marketplace`].
    config: Config,

    /// [`Database`] of this [`Marketplace`].
    database: Db,
}

impl<Db> Marketplace<Db> {
    /// Creates a new [`Marketplace`] along with the [`task::Background`]
    /// running its tasks.
    pub fn new(config: Config, database: Db) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::ExpireQuotations<Self>,
                        task::expire_quotations::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Self { config, database };

        let mut bg = task::Background::default();
        let market = this.clone();
        bg.spawn(async move {
            market
                .execute(Start(By::new(market.config().expire_quotations)))
                .await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Marketplace`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Marketplace`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }
}

#[cfg(test)]
impl<Db> Marketplace<Db> {
    /// Creates a new [`Marketplace`] without spawning its tasks.
    pub(crate) fn without_tasks(config: Config, database: Db) -> Self {
        Self { config, database }
    }
}
