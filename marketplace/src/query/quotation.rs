//! [`Query`] collection related to [`Quotation`].

use common::operations::By;

use crate::{
    domain::{quotation, service, Quotation},
    read,
};
#[cfg(doc)]
use crate::{domain::Service, Query};

use super::{DatabaseQuery, PageQuery};

/// Queries a [`Quotation`] by its [`quotation::Id`].
pub type ById = DatabaseQuery<By<Option<Quotation>, quotation::Id>>;

/// Queries all [`Quotation`]s of a [`Service`].
pub type ByService = DatabaseQuery<By<Vec<Quotation>, service::Id>>;

/// Queries a page of [`Quotation`]s.
pub type List = PageQuery<Quotation, read::quotation::list::Filter>;
