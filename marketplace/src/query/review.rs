//! [`Query`] collection related to [`Review`].

use common::operations::By;

use crate::{
    domain::{review, service, Review},
    read,
};
#[cfg(doc)]
use crate::{domain::Service, Query};

use super::{DatabaseQuery, PageQuery};

/// Queries a [`Review`] by its [`review::Id`].
pub type ById = DatabaseQuery<By<Option<Review>, review::Id>>;

/// Queries all [`Review`]s of a [`Service`], newest first.
pub type ByService = DatabaseQuery<By<Vec<Review>, service::Id>>;

/// Queries a page of [`Review`]s, newest first.
pub type List = PageQuery<Review, read::review::list::Filter>;
