//! Helpers for testing the [`Marketplace`].

use std::time::Duration;

use common::Handler as _;

use crate::{
    command::{CreateQuotation, CreateService},
    domain::{quotation, seller, service, Quotation, Service, Subcategory},
    infra::database::memory::Memory,
    query, task, Config, Marketplace,
};

/// Creates a new [`Marketplace`] on top of an empty [`Memory`].
pub(crate) fn marketplace() -> (Marketplace<Memory>, Memory) {
    let db = Memory::default();
    let config = Config {
        expire_quotations: task::expire_quotations::Config {
            interval: Duration::from_secs(60),
        },
    };
    (Marketplace::without_tasks(config, db.clone()), db)
}

/// Stores a new [`Subcategory`] along with its category.
pub(crate) fn subcategory(db: &Memory) -> Subcategory {
    let category = db.add_category("Home");
    db.add_subcategory(category.id, "Plumbing")
}

/// Returns a [`seller::Id`] out of the provided `id`.
pub(crate) fn seller_id(id: &str) -> seller::Id {
    seller::Id::new(id).expect("valid seller ID")
}

/// Returns a [`CreateService`] [`Command`] listing a [`Service`] under the
/// provided [`Subcategory`].
///
/// [`Command`]: crate::Command
pub(crate) fn create_service(
    subcategory_id: crate::domain::subcategory::Id,
) -> CreateService {
    CreateService {
        name: service::Name::new("Pipe repair").expect("valid name"),
        description: None,
        seller_id: seller_id("seller-1"),
        subcategory_id,
        pricing: service::Pricing::Fixed,
        base_price: service::Price::from_f64(49.9),
        price_range: None,
        duration: service::Minutes::new(90),
        is_active: None,
        images: vec![],
        tags: vec![service::Tag::new("pipes").expect("valid tag")],
    }
}

/// Creates a new [`Service`] in a fresh [`Subcategory`].
pub(crate) async fn service(
    market: &Marketplace<Memory>,
    db: &Memory,
) -> Service {
    let subcategory = subcategory(db);
    market
        .execute(create_service(subcategory.id))
        .await
        .expect("created service")
}

/// Queries a [`Service`] by its ID.
pub(crate) async fn service_by_id(
    market: &Marketplace<Memory>,
    id: service::Id,
) -> Option<Service> {
    market
        .execute(query::service::ById::by(id))
        .await
        .expect("queried service")
}

/// Returns a [`CreateQuotation`] [`Command`] for the provided [`Service`].
///
/// [`Command`]: crate::Command
pub(crate) fn create_quotation(service: &Service) -> CreateQuotation {
    CreateQuotation {
        service_id: service.id,
        client_id: seller_id("client-1"),
        provider_id: service.seller_id.clone(),
        title: quotation::Title::new("Kitchen sink").expect("valid title"),
        description: quotation::Description::new("Leaks under the sink")
            .expect("valid description"),
        estimated_price: None,
        estimated_duration: None,
        client_notes: None,
        attachments: None,
        expires_at: None,
    }
}

/// Creates a new [`Quotation`] for the provided [`Service`].
pub(crate) async fn quotation(
    market: &Marketplace<Memory>,
    service: &Service,
) -> Quotation {
    market
        .execute(create_quotation(service))
        .await
        .expect("created quotation")
}
