use std::sync::Arc;

use parceltrack_delivery::{DeliveryService, PublishedDeliveryEvent};
use parceltrack_events::InMemoryEventBus;
use parceltrack_infra::InMemoryDeliveryRepository;

/// Bus carrying published delivery lifecycle events.
pub type DeliveryEventBus = Arc<InMemoryEventBus<PublishedDeliveryEvent>>;

/// Application services shared by all handlers.
pub struct AppServices {
    pub deliveries: DeliveryService<DeliveryEventBus>,
    /// Kept alongside the service so consumers (notification workers,
    /// operational tooling) can subscribe to lifecycle events.
    pub events: DeliveryEventBus,
}

/// Wire the in-memory adapters into the delivery service.
pub fn build_services() -> AppServices {
    let repository = Arc::new(InMemoryDeliveryRepository::new());
    let bus: DeliveryEventBus = Arc::new(InMemoryEventBus::new());

    AppServices {
        deliveries: DeliveryService::new(repository, bus.clone()),
        events: bus,
    }
}
