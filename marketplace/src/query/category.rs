//! [`Query`] collection related to [`Category`].

use common::operations::By;

use crate::domain::{category, Category};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Category`] by its [`category::Id`].
pub type ById = DatabaseQuery<By<Option<Category>, category::Id>>;

/// Queries the whole catalog of [`Category`]s ordered by their names.
pub type Catalog = DatabaseQuery<By<Vec<Category>, ()>>;
