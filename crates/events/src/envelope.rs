use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope for an event published to consumers.
///
/// The envelope gives every published event a process-unique identifier so
/// downstream consumers can deduplicate. `payload` is the domain event itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(event_id: Uuid, payload: E) -> Self {
        Self { event_id, payload }
    }

    /// Wrap a payload with a fresh time-ordered (UUIDv7) event id.
    pub fn wrap(payload: E) -> Self {
        Self::new(Uuid::now_v7(), payload)
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
