//! [`Query`] collection related to [`Subcategory`].

use common::operations::By;

use crate::{
    domain::{category, subcategory, Subcategory},
    read,
};
#[cfg(doc)]
use crate::{
    domain::{Category, Service},
    Query,
};

use super::{DatabaseQuery, PageQuery};

/// Queries a [`Subcategory`] by its [`subcategory::Id`].
pub type ById = DatabaseQuery<By<Option<Subcategory>, subcategory::Id>>;

/// Queries all [`Subcategory`]s of a [`Category`] ordered by their names.
pub type ByCategory = DatabaseQuery<By<Vec<Subcategory>, category::Id>>;

/// Queries a page of [`Subcategory`]s.
pub type List = PageQuery<Subcategory, read::subcategory::list::Filter>;

/// Queries the number of [`Service`]s listed under a [`Subcategory`].
pub type ServiceCount =
    DatabaseQuery<By<read::subcategory::ServiceCount, subcategory::Id>>;
