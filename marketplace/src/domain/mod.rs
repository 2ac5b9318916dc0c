//! Domain definitions.

pub mod category;
pub mod quotation;
pub mod review;
pub mod seller;
pub mod service;
pub mod subcategory;

pub use self::{
    category::Category, quotation::Quotation, review::Review,
    service::Service, subcategory::Subcategory,
};
