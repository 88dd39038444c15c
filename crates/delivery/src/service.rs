use std::sync::Arc;

use chrono::{DateTime, Utc};

use parceltrack_core::{DomainError, DomainResult};
use parceltrack_events::{EventBus, EventEnvelope};

use crate::delivery::{Delivery, DeliveryStatus};
use crate::events::DeliveryEvent;
use crate::ids::{Address, DeliveryId, DeliveryPersonId, OrderNumber, RouteId};
use crate::repository::DeliveryRepository;

/// What the orchestrator hands to the bus: a delivery event wrapped with a
/// process-unique event id.
pub type PublishedDeliveryEvent = EventEnvelope<DeliveryEvent>;

/// Use-case orchestrator for the delivery lifecycle.
///
/// Every mutating operation follows the same shape: load the aggregate (or
/// report not-found), invoke the entity operation (domain errors propagate
/// unchanged), persist, then publish the drained events in the order the
/// transitions occurred.
pub struct DeliveryService<B> {
    repository: Arc<dyn DeliveryRepository>,
    bus: B,
}

impl<B> DeliveryService<B>
where
    B: EventBus<PublishedDeliveryEvent>,
{
    pub fn new(repository: Arc<dyn DeliveryRepository>, bus: B) -> Self {
        Self { repository, bus }
    }

    /// Schedule a new delivery.
    ///
    /// Fails with the already-exists kind when the identity is taken.
    pub fn create_delivery(
        &self,
        id: DeliveryId,
        route_id: RouteId,
        delivery_person_id: DeliveryPersonId,
        address: Address,
        order_number: OrderNumber,
        scheduled_date: DateTime<Utc>,
    ) -> DomainResult<Delivery> {
        if self.repository.exists(&id)? {
            return Err(DomainError::already_exists(format!(
                "delivery {id} already exists"
            )));
        }

        let mut delivery = Delivery::schedule(
            id,
            route_id,
            delivery_person_id,
            address,
            order_number,
            scheduled_date,
        );
        let events = delivery.take_events();
        let stored = self.repository.save(delivery)?;

        tracing::info!(delivery_id = %stored.id(), "delivery scheduled");
        self.publish(events);

        Ok(stored)
    }

    pub fn delivery_by_id(&self, id: &DeliveryId) -> DomainResult<Option<Delivery>> {
        self.repository.find_by_id(id)
    }

    pub fn deliveries_by_route(&self, route_id: &RouteId) -> DomainResult<Vec<Delivery>> {
        self.repository.find_by_route(route_id)
    }

    pub fn deliveries_by_delivery_person(
        &self,
        delivery_person_id: &DeliveryPersonId,
    ) -> DomainResult<Vec<Delivery>> {
        self.repository.find_by_delivery_person(delivery_person_id)
    }

    pub fn deliveries_by_order(&self, order_number: &OrderNumber) -> DomainResult<Vec<Delivery>> {
        self.repository.find_by_order_number(order_number)
    }

    pub fn deliveries_by_status(&self, status: DeliveryStatus) -> DomainResult<Vec<Delivery>> {
        self.repository.find_by_status(status)
    }

    /// Overdue filtering is delegated to the repository for scale; the
    /// semantics are defined by `Delivery::is_overdue`.
    pub fn overdue_deliveries(&self) -> DomainResult<Vec<Delivery>> {
        self.repository.find_overdue()
    }

    pub fn deliveries_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Delivery>> {
        self.repository.find_scheduled_between(start, end)
    }

    pub fn update_delivery_status(
        &self,
        id: &DeliveryId,
        new_status: DeliveryStatus,
    ) -> DomainResult<Delivery> {
        self.mutate(id, |delivery| {
            delivery.update_status(new_status);
            Ok(())
        })
    }

    pub fn mark_delivery_in_transit(&self, id: &DeliveryId) -> DomainResult<Delivery> {
        self.mutate(id, Delivery::mark_in_transit)
    }

    pub fn mark_delivery_out_for_delivery(&self, id: &DeliveryId) -> DomainResult<Delivery> {
        self.mutate(id, Delivery::mark_out_for_delivery)
    }

    pub fn mark_delivery_delivered(&self, id: &DeliveryId) -> DomainResult<Delivery> {
        self.mutate(id, Delivery::mark_delivered)
    }

    pub fn mark_delivery_failed(&self, id: &DeliveryId, reason: &str) -> DomainResult<Delivery> {
        self.mutate(id, |delivery| delivery.mark_failed(reason))
    }

    pub fn cancel_delivery(&self, id: &DeliveryId, reason: &str) -> DomainResult<Delivery> {
        self.mutate(id, |delivery| delivery.cancel(reason))
    }

    pub fn add_delivery_notes(&self, id: &DeliveryId, notes: &str) -> DomainResult<Delivery> {
        self.mutate(id, |delivery| delivery.add_notes(notes))
    }

    /// Load, mutate, persist, publish.
    fn mutate(
        &self,
        id: &DeliveryId,
        op: impl FnOnce(&mut Delivery) -> DomainResult<()>,
    ) -> DomainResult<Delivery> {
        let mut delivery = self
            .repository
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found(format!("delivery {id} not found")))?;

        let old_status = delivery.status();
        op(&mut delivery)?;
        let new_status = delivery.status();

        let events = delivery.take_events();
        let stored = self.repository.save(delivery)?;

        if old_status != new_status {
            tracing::info!(
                delivery_id = %id,
                from = %old_status,
                to = %new_status,
                "delivery status changed"
            );
        }
        self.publish(events);

        Ok(stored)
    }

    /// Hand drained events to the bus, in the order the transitions occurred.
    ///
    /// The aggregate is already persisted at this point; a failed publish is
    /// logged and otherwise tolerated (the bus distributes, it does not store).
    fn publish(&self, events: Vec<DeliveryEvent>) {
        for event in events {
            if let Err(err) = self.bus.publish(EventEnvelope::wrap(event)) {
                tracing::warn!(error = ?err, "failed to publish delivery event");
            }
        }
    }
}
