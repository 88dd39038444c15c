//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus is the **transport** for events after the owning aggregate has been
//! persisted: the orchestrator drains events from the entity and publishes them
//! here, and consumers (notifiers, auditors, read models) subscribe.
//!
//! The contract is intentionally lightweight:
//!
//! - **Transport-agnostic**: works with in-memory channels, message queues, etc.
//! - **Broadcast semantics**: each subscriber gets a copy of every event.
//! - **Ordering**: events from a single publisher arrive in publish order;
//!   ordering across concurrent publishers is implementation-defined.
//! - **No persistence**: the bus distributes, the repository stores.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to an event stream.
///
/// Each subscription receives a copy of all events published to the bus.
/// Subscriptions are designed for single-threaded consumption.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// `publish()` can fail (bus full, transport error). Events are persisted with
/// their aggregate before publication, so a failed publish loses nothing that
/// cannot be recovered from the store of record.
///
/// Implementations must be `Send + Sync`; multiple threads may publish
/// concurrently.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
