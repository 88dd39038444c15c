use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use parceltrack_events::Event;

use crate::delivery::DeliveryStatus;
use crate::ids::{DeliveryId, DeliveryPersonId, RouteId};

/// Event: a delivery was created and scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryCreated {
    pub delivery_id: DeliveryId,
    pub route_id: RouteId,
    pub delivery_person_id: DeliveryPersonId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: the delivery moved from one status to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryStatusChanged {
    pub delivery_id: DeliveryId,
    pub old_status: DeliveryStatus,
    pub new_status: DeliveryStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Domain events produced by the `Delivery` aggregate.
///
/// A closed set: construction records exactly one `Created`, every status
/// change records exactly one `StatusChanged`. Events stay with the producing
/// instance until drained via `Delivery::take_events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryEvent {
    Created(DeliveryCreated),
    StatusChanged(DeliveryStatusChanged),
}

impl DeliveryEvent {
    pub fn delivery_id(&self) -> &DeliveryId {
        match self {
            DeliveryEvent::Created(e) => &e.delivery_id,
            DeliveryEvent::StatusChanged(e) => &e.delivery_id,
        }
    }
}

impl Event for DeliveryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DeliveryEvent::Created(_) => "delivery.created",
            DeliveryEvent::StatusChanged(_) => "delivery.status_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DeliveryEvent::Created(e) => e.occurred_at,
            DeliveryEvent::StatusChanged(e) => e.occurred_at,
        }
    }
}
