//! [`Command`] definition.

pub mod change_quotation_status;
pub mod create_quotation;
pub mod create_review;
pub mod create_service;
pub mod delete_quotation;
pub mod delete_review;
pub mod delete_service;
pub mod toggle_service_active;
pub mod update_quotation;
pub mod update_service;

/// [`Command`] of the [`Marketplace`].
///
/// [`Marketplace`]: crate::Marketplace
pub use common::Handler as Command;

pub use self::{
    change_quotation_status::ChangeQuotationStatus,
    create_quotation::CreateQuotation, create_review::CreateReview,
    create_service::CreateService, delete_quotation::DeleteQuotation,
    delete_review::DeleteReview, delete_service::DeleteService,
    toggle_service_active::ToggleServiceActive,
    update_quotation::UpdateQuotation, update_service::UpdateService,
};
