//! `Seller`-related definitions.
//!
//! Sellers are owned by another subgraph, so only their IDs are known here.

use common::define_text;

#[cfg(doc)]
use crate::domain::{Quotation, Review, Service};

define_text! {
    #[doc = "ID of a `Seller` offering [`Service`]s, requesting or \
             providing [`Quotation`]s and leaving [`Review`]s."]
    struct Id(max = 255);
}
