//! Background [`Task`]s definitions.

mod background;
pub mod expire_quotations;

pub use common::Handler as Task;

pub use self::{background::Background, expire_quotations::ExpireQuotations};
