use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use parceltrack_core::{AggregateRoot, DomainError, DomainResult};
use parceltrack_delivery::{
    Delivery, DeliveryId, DeliveryPersonId, DeliveryRepository, DeliveryStatus, OrderNumber,
    RouteId,
};

/// In-memory delivery store.
///
/// Intended for tests/dev and single-process deployments. Not optimized for
/// performance: list queries scan the whole map.
///
/// The at-most-one-writer-per-identity contract is enforced with an optimistic
/// version check under the write lock: a save whose aggregate version does not
/// advance past the stored version is a stale read-modify-write and is
/// rejected with the conflict kind.
#[derive(Debug, Default)]
pub struct InMemoryDeliveryRepository {
    deliveries: RwLock<HashMap<DeliveryId, Delivery>>,
}

impl InMemoryDeliveryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect(&self, keep: impl Fn(&Delivery) -> bool) -> DomainResult<Vec<Delivery>> {
        let deliveries = self
            .deliveries
            .read()
            .map_err(|_| DomainError::conflict("delivery store lock poisoned"))?;
        Ok(deliveries.values().filter(|d| keep(d)).cloned().collect())
    }
}

impl DeliveryRepository for InMemoryDeliveryRepository {
    fn save(&self, delivery: Delivery) -> DomainResult<Delivery> {
        let mut deliveries = self
            .deliveries
            .write()
            .map_err(|_| DomainError::conflict("delivery store lock poisoned"))?;

        if let Some(existing) = deliveries.get(delivery.id()) {
            if delivery.version() <= existing.version() {
                return Err(DomainError::conflict(format!(
                    "stale write for delivery {} (stored version {}, attempted {})",
                    delivery.id(),
                    existing.version(),
                    delivery.version()
                )));
            }
        }

        deliveries.insert(delivery.id().clone(), delivery.clone());
        Ok(delivery)
    }

    fn find_by_id(&self, id: &DeliveryId) -> DomainResult<Option<Delivery>> {
        let deliveries = self
            .deliveries
            .read()
            .map_err(|_| DomainError::conflict("delivery store lock poisoned"))?;
        Ok(deliveries.get(id).cloned())
    }

    fn find_by_route(&self, route_id: &RouteId) -> DomainResult<Vec<Delivery>> {
        self.collect(|d| d.route_id() == route_id)
    }

    fn find_by_delivery_person(
        &self,
        delivery_person_id: &DeliveryPersonId,
    ) -> DomainResult<Vec<Delivery>> {
        self.collect(|d| d.delivery_person_id() == delivery_person_id)
    }

    fn find_by_order_number(&self, order_number: &OrderNumber) -> DomainResult<Vec<Delivery>> {
        self.collect(|d| d.order_number() == order_number)
    }

    fn find_by_status(&self, status: DeliveryStatus) -> DomainResult<Vec<Delivery>> {
        self.collect(|d| d.status() == status)
    }

    fn find_scheduled_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Delivery>> {
        self.collect(|d| d.scheduled_date() >= start && d.scheduled_date() <= end)
    }

    fn find_overdue(&self) -> DomainResult<Vec<Delivery>> {
        // The entity predicate is the source of truth for "overdue".
        self.collect(Delivery::is_overdue)
    }

    fn delete(&self, id: &DeliveryId) -> DomainResult<()> {
        let mut deliveries = self
            .deliveries
            .write()
            .map_err(|_| DomainError::conflict("delivery store lock poisoned"))?;
        deliveries.remove(id);
        Ok(())
    }

    fn exists(&self, id: &DeliveryId) -> DomainResult<bool> {
        let deliveries = self
            .deliveries
            .read()
            .map_err(|_| DomainError::conflict("delivery store lock poisoned"))?;
        Ok(deliveries.contains_key(id))
    }

    fn count(&self) -> DomainResult<u64> {
        let deliveries = self
            .deliveries
            .read()
            .map_err(|_| DomainError::conflict("delivery store lock poisoned"))?;
        Ok(deliveries.len() as u64)
    }

    fn count_by_status(&self, status: DeliveryStatus) -> DomainResult<u64> {
        let deliveries = self
            .deliveries
            .read()
            .map_err(|_| DomainError::conflict("delivery store lock poisoned"))?;
        Ok(deliveries.values().filter(|d| d.status() == status).count() as u64)
    }
}
