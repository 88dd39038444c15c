//! Persistence port for deliveries.

use chrono::{DateTime, Utc};

use parceltrack_core::DomainResult;

use crate::delivery::{Delivery, DeliveryStatus};
use crate::ids::{DeliveryId, DeliveryPersonId, OrderNumber, RouteId};

/// Abstract persistence contract the delivery domain depends on.
///
/// Implementations live in adapter crates. Read queries return empty
/// collections on no match, never an error. `save` must reject a write whose
/// aggregate version does not advance past the stored version: two writers
/// racing from the same loaded state must not both succeed.
pub trait DeliveryRepository: Send + Sync {
    /// Persist the delivery, returning the stored instance.
    fn save(&self, delivery: Delivery) -> DomainResult<Delivery>;

    fn find_by_id(&self, id: &DeliveryId) -> DomainResult<Option<Delivery>>;

    fn find_by_route(&self, route_id: &RouteId) -> DomainResult<Vec<Delivery>>;

    fn find_by_delivery_person(
        &self,
        delivery_person_id: &DeliveryPersonId,
    ) -> DomainResult<Vec<Delivery>>;

    fn find_by_order_number(&self, order_number: &OrderNumber) -> DomainResult<Vec<Delivery>>;

    fn find_by_status(&self, status: DeliveryStatus) -> DomainResult<Vec<Delivery>>;

    /// Deliveries scheduled within `[start, end]`.
    fn find_scheduled_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Delivery>>;

    /// Deliveries past their scheduled date that are not in a terminal status.
    ///
    /// Must agree with [`Delivery::is_overdue`]; the entity predicate is the
    /// source of truth for the semantics.
    fn find_overdue(&self) -> DomainResult<Vec<Delivery>>;

    /// Remove the persisted record. Deleting an absent id is a no-op.
    fn delete(&self, id: &DeliveryId) -> DomainResult<()>;

    fn exists(&self, id: &DeliveryId) -> DomainResult<bool>;

    fn count(&self) -> DomainResult<u64>;

    fn count_by_status(&self, status: DeliveryStatus) -> DomainResult<u64>;
}
