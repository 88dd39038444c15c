use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use parceltrack_core::{AggregateRoot, DomainError, DomainResult};

use crate::events::{DeliveryCreated, DeliveryEvent, DeliveryStatusChanged};
use crate::ids::{Address, DeliveryId, DeliveryPersonId, OrderNumber, RouteId};

/// Delivery status lifecycle.
///
/// Happy path: `Scheduled -> InTransit -> OutForDelivery -> Delivered`, with
/// `Failed` and `Cancelled` as alternative terminal outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Scheduled,
    InTransit,
    OutForDelivery,
    Delivered,
    Failed,
    Cancelled,
}

impl DeliveryStatus {
    /// Statuses from which no further lifecycle transition is defined.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::InTransit => "IN_TRANSIT",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl core::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for DeliveryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SCHEDULED" => Ok(Self::Scheduled),
            "IN_TRANSIT" => Ok(Self::InTransit),
            "OUT_FOR_DELIVERY" => Ok(Self::OutForDelivery),
            "DELIVERED" => Ok(Self::Delivered),
            "FAILED" => Ok(Self::Failed),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(DomainError::validation(format!(
                "unknown delivery status: {other}"
            ))),
        }
    }
}

/// Aggregate root: a physical delivery attached to a customer order.
///
/// Identity, assignment, address and schedule are fixed at construction;
/// `status`, `actual_delivery_date` and `notes` change only through the
/// methods below. Every status change records exactly one `StatusChanged`
/// event and construction records exactly one `Created` event; recorded
/// events stay with the instance until drained via [`Delivery::take_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    id: DeliveryId,
    route_id: RouteId,
    delivery_person_id: DeliveryPersonId,
    address: Address,
    order_number: OrderNumber,
    scheduled_date: DateTime<Utc>,
    status: DeliveryStatus,
    actual_delivery_date: Option<DateTime<Utc>>,
    notes: Option<String>,
    version: u64,
    pending_events: Vec<DeliveryEvent>,
}

impl Delivery {
    /// Schedule a new delivery. The aggregate starts in `Scheduled`.
    pub fn schedule(
        id: DeliveryId,
        route_id: RouteId,
        delivery_person_id: DeliveryPersonId,
        address: Address,
        order_number: OrderNumber,
        scheduled_date: DateTime<Utc>,
    ) -> Self {
        let created = DeliveryEvent::Created(DeliveryCreated {
            delivery_id: id.clone(),
            route_id: route_id.clone(),
            delivery_person_id: delivery_person_id.clone(),
            occurred_at: Utc::now(),
        });

        let mut delivery = Self {
            id,
            route_id,
            delivery_person_id,
            address,
            order_number,
            scheduled_date,
            status: DeliveryStatus::Scheduled,
            actual_delivery_date: None,
            notes: None,
            version: 0,
            pending_events: Vec::new(),
        };
        delivery.record(created);
        delivery
    }

    pub fn id(&self) -> &DeliveryId {
        &self.id
    }

    pub fn route_id(&self) -> &RouteId {
        &self.route_id
    }

    pub fn delivery_person_id(&self) -> &DeliveryPersonId {
        &self.delivery_person_id
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    pub fn scheduled_date(&self) -> DateTime<Utc> {
        self.scheduled_date
    }

    pub fn status(&self) -> DeliveryStatus {
        self.status
    }

    pub fn actual_delivery_date(&self) -> Option<DateTime<Utc>> {
        self.actual_delivery_date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Events recorded since the last drain, in the order they occurred.
    pub fn pending_events(&self) -> &[DeliveryEvent] {
        &self.pending_events
    }

    /// Move all recorded events out of the aggregate.
    ///
    /// The orchestrator drains before handing the events to the publisher; a
    /// second drain yields nothing.
    pub fn take_events(&mut self) -> Vec<DeliveryEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Force the status to `new_status`.
    ///
    /// This is the single mutation primitive; the named transition helpers
    /// enforce their precondition and then delegate here. The first transition
    /// into `Delivered` stamps `actual_delivery_date`; any later visit leaves
    /// the stamp untouched.
    pub fn update_status(&mut self, new_status: DeliveryStatus) {
        let old_status = self.status;
        self.status = new_status;

        if new_status == DeliveryStatus::Delivered && self.actual_delivery_date.is_none() {
            self.actual_delivery_date = Some(Utc::now());
        }

        self.record(DeliveryEvent::StatusChanged(DeliveryStatusChanged {
            delivery_id: self.id.clone(),
            old_status,
            new_status,
            occurred_at: Utc::now(),
        }));
    }

    pub fn mark_in_transit(&mut self) -> DomainResult<()> {
        if self.status != DeliveryStatus::Scheduled {
            return Err(DomainError::invalid_transition(format!(
                "delivery must be SCHEDULED to go in transit (was {})",
                self.status
            )));
        }
        self.update_status(DeliveryStatus::InTransit);
        Ok(())
    }

    pub fn mark_out_for_delivery(&mut self) -> DomainResult<()> {
        if self.status != DeliveryStatus::InTransit {
            return Err(DomainError::invalid_transition(format!(
                "delivery must be IN_TRANSIT to go out for delivery (was {})",
                self.status
            )));
        }
        self.update_status(DeliveryStatus::OutForDelivery);
        Ok(())
    }

    pub fn mark_delivered(&mut self) -> DomainResult<()> {
        if self.status != DeliveryStatus::OutForDelivery {
            return Err(DomainError::invalid_transition(format!(
                "delivery must be OUT_FOR_DELIVERY to be delivered (was {})",
                self.status
            )));
        }
        self.update_status(DeliveryStatus::Delivered);
        Ok(())
    }

    /// Mark the delivery failed, replacing any notes with the failure reason.
    pub fn mark_failed(&mut self, reason: impl Into<String>) -> DomainResult<()> {
        if !matches!(
            self.status,
            DeliveryStatus::InTransit | DeliveryStatus::OutForDelivery
        ) {
            return Err(DomainError::invalid_transition(format!(
                "delivery must be IN_TRANSIT or OUT_FOR_DELIVERY to fail (was {})",
                self.status
            )));
        }
        self.notes = Some(reason.into());
        self.update_status(DeliveryStatus::Failed);
        Ok(())
    }

    /// Cancel the delivery, replacing any notes with the cancellation reason.
    pub fn cancel(&mut self, reason: impl Into<String>) -> DomainResult<()> {
        if matches!(
            self.status,
            DeliveryStatus::Delivered | DeliveryStatus::Cancelled
        ) {
            return Err(DomainError::invalid_transition(format!(
                "delivery cannot be cancelled once {}",
                self.status
            )));
        }
        self.notes = Some(reason.into());
        self.update_status(DeliveryStatus::Cancelled);
        Ok(())
    }

    /// Overwrite the free-text notes. Not gated by status.
    pub fn add_notes(&mut self, notes: &str) -> DomainResult<()> {
        if notes.trim().is_empty() {
            return Err(DomainError::validation("notes must not be blank"));
        }
        self.notes = Some(notes.to_owned());
        self.touch();
        Ok(())
    }

    /// True while the delivery is still in flight past its scheduled date.
    ///
    /// Evaluated against wall-clock time at call time, never cached.
    pub fn is_overdue(&self) -> bool {
        !self.status.is_terminal() && Utc::now() > self.scheduled_date
    }

    pub fn can_be_reassigned(&self) -> bool {
        matches!(
            self.status,
            DeliveryStatus::Scheduled | DeliveryStatus::InTransit
        )
    }

    /// Hand the delivery to a different delivery person.
    ///
    /// Only legal while the parcel has not yet gone out for delivery.
    pub fn reassign_to(&mut self, new_delivery_person_id: DeliveryPersonId) -> DomainResult<()> {
        if !self.can_be_reassigned() {
            return Err(DomainError::invalid_transition(format!(
                "delivery cannot be reassigned while {}",
                self.status
            )));
        }
        self.delivery_person_id = new_delivery_person_id;
        self.touch();
        Ok(())
    }

    /// Record a state change: bump the version and remember the event.
    fn record(&mut self, event: DeliveryEvent) {
        self.version += 1;
        self.pending_events.push(event);
    }

    /// A mutation without a corresponding event still advances the version so
    /// a stale writer loses the save-time concurrency check.
    fn touch(&mut self) {
        self.version += 1;
    }
}

impl AggregateRoot for Delivery {
    type Id = DeliveryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}


#[cfg(test)]
mod properties {
    use chrono::Duration;
    use proptest::prelude::*;

    use super::*;

    #[derive(Debug, Clone)]
    enum Op {
        InTransit,
        OutForDelivery,
        Delivered,
        Failed,
        Cancel,
        Notes,
        Force(DeliveryStatus),
    }

    fn any_status() -> impl Strategy<Value = DeliveryStatus> {
        prop_oneof![
            Just(DeliveryStatus::Scheduled),
            Just(DeliveryStatus::InTransit),
            Just(DeliveryStatus::OutForDelivery),
            Just(DeliveryStatus::Delivered),
            Just(DeliveryStatus::Failed),
            Just(DeliveryStatus::Cancelled),
        ]
    }

    fn any_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::InTransit),
            Just(Op::OutForDelivery),
            Just(Op::Delivered),
            Just(Op::Failed),
            Just(Op::Cancel),
            Just(Op::Notes),
            any_status().prop_map(Op::Force),
        ]
    }

    proptest! {
        // Whatever sequence of operations is thrown at the aggregate:
        // the delivered stamp exists iff DELIVERED was reached at least once,
        // exactly one event is recorded per status change, and a terminal
        // status is never reported overdue.
        #[test]
        fn lifecycle_invariants_hold(ops in proptest::collection::vec(any_op(), 0..32)) {
            let mut delivery = Delivery::schedule(
                DeliveryId::new("D-prop").unwrap(),
                RouteId::new("R-prop").unwrap(),
                DeliveryPersonId::new("P-prop").unwrap(),
                Address::new("1 Test Way", "Testville", "00000", "US"),
                OrderNumber::new("ORD-prop").unwrap(),
                Utc::now() - Duration::days(1),
            );

            let mut transitions = 0u64;
            let mut reached_delivered = false;

            for op in ops {
                let before = delivery.status();
                let is_notes = matches!(op, Op::Notes);
                let result = match op {
                    Op::InTransit => delivery.mark_in_transit(),
                    Op::OutForDelivery => delivery.mark_out_for_delivery(),
                    Op::Delivered => delivery.mark_delivered(),
                    Op::Failed => delivery.mark_failed("prop failure"),
                    Op::Cancel => delivery.cancel("prop cancel"),
                    Op::Notes => delivery.add_notes("prop note"),
                    Op::Force(target) => {
                        delivery.update_status(target);
                        Ok(())
                    }
                };

                if result.is_ok() && !is_notes {
                    transitions += 1;
                    reached_delivered |= delivery.status() == DeliveryStatus::Delivered;
                } else if result.is_err() {
                    prop_assert_eq!(delivery.status(), before);
                }
            }

            prop_assert_eq!(delivery.actual_delivery_date().is_some(), reached_delivered);
            prop_assert_eq!(delivery.pending_events().len() as u64, 1 + transitions);
            if delivery.status().is_terminal() {
                prop_assert!(!delivery.is_overdue());
            }
        }
    }
}
