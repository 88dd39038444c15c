use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use parceltrack_delivery::{Address, Delivery};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct AddressDto {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl AddressDto {
    pub fn from_domain(address: &Address) -> Self {
        Self {
            street: address.street.clone(),
            city: address.city.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
        }
    }

    pub fn into_domain(self) -> Address {
        Address::new(self.street, self.city, self.postal_code, self.country)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDeliveryRequest {
    pub delivery_id: String,
    pub route_id: String,
    pub delivery_person_id: String,
    pub order_number: String,
    pub scheduled_date: DateTime<Utc>,
    pub address: AddressDto,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ReasonRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct DeliveryResponse {
    pub delivery_id: String,
    pub route_id: String,
    pub delivery_person_id: String,
    pub order_number: String,
    pub address: AddressDto,
    pub scheduled_date: DateTime<Utc>,
    pub status: String,
    pub actual_delivery_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl DeliveryResponse {
    pub fn from_domain(delivery: &Delivery) -> Self {
        Self {
            delivery_id: delivery.id().to_string(),
            route_id: delivery.route_id().to_string(),
            delivery_person_id: delivery.delivery_person_id().to_string(),
            order_number: delivery.order_number().to_string(),
            address: AddressDto::from_domain(delivery.address()),
            scheduled_date: delivery.scheduled_date(),
            status: delivery.status().to_string(),
            actual_delivery_date: delivery.actual_delivery_date(),
            notes: delivery.notes().map(str::to_owned),
        }
    }
}
