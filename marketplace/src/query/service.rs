//! [`Query`] collection related to [`Service`].

use common::operations::By;

use crate::{
    domain::{service, Service},
    read,
};
#[cfg(doc)]
use crate::{domain::Review, Query};

use super::{DatabaseQuery, PageQuery};

/// Queries a [`Service`] by its [`service::Id`].
pub type ById = DatabaseQuery<By<Option<Service>, service::Id>>;

/// Queries a page of [`Service`]s.
pub type List = PageQuery<Service, read::service::list::Filter>;

/// Queries the summary of [`Review`]s left on a [`Service`].
pub type RatingSummary =
    DatabaseQuery<By<read::service::RatingSummary, service::Id>>;
