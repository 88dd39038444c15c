//! Delivery lifecycle domain module.
//!
//! This crate contains the business rules for physical deliveries: validated
//! identifiers, the `Delivery` aggregate and its status state machine, the
//! domain events it produces, the persistence port it depends on, and the
//! use-case orchestrator. Domain logic is deterministic and in-memory; all IO
//! goes through the ports.

pub mod delivery;
pub mod events;
pub mod ids;
pub mod repository;
pub mod service;

pub use delivery::{Delivery, DeliveryStatus};
pub use events::{DeliveryCreated, DeliveryEvent, DeliveryStatusChanged};
pub use ids::{Address, DeliveryId, DeliveryPersonId, OrderNumber, RouteId};
pub use repository::DeliveryRepository;
pub use service::{DeliveryService, PublishedDeliveryEvent};
