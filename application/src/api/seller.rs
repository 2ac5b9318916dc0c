//! [`Seller`]-related definitions.

use derive_more::From;
use juniper::{graphql_object, ID};
use marketplace::domain;

use crate::{api, Context};

/// A seller, owned by another subgraph.
///
/// Only its ID is known here.
#[derive(Clone, Debug, From)]
pub struct Seller(domain::seller::Id);

/// A seller of the marketplace.
#[graphql_object(context = Context)]
impl Seller {
    /// Unique identifier of this `Seller`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Seller.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> ID {
        ID::from(self.0.to_string())
    }
}
