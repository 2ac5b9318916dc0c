//! Read entities definitions.

pub mod quotation;
pub mod review;
pub mod service;
pub mod subcategory;
