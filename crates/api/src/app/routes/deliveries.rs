use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use parceltrack_core::DomainError;
use parceltrack_delivery::{
    Delivery, DeliveryId, DeliveryPersonId, DeliveryStatus, OrderNumber, RouteId,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().nest("/deliveries", deliveries_router())
}

fn deliveries_router() -> Router {
    Router::new()
        .route("/", post(create_delivery))
        .route("/overdue", get(overdue_deliveries))
        .route("/date-range", get(deliveries_by_date_range))
        .route("/route/:route_id", get(deliveries_by_route))
        .route("/delivery-person/:person_id", get(deliveries_by_delivery_person))
        .route("/order/:order_number", get(deliveries_by_order))
        .route("/status/:status", get(deliveries_by_status))
        .route("/:id", get(get_delivery))
        .route("/:id/status", put(update_delivery_status))
        .route("/:id/in-transit", put(mark_in_transit))
        .route("/:id/out-for-delivery", put(mark_out_for_delivery))
        .route("/:id/delivered", put(mark_delivered))
        .route("/:id/failed", put(mark_failed))
        .route("/:id/cancel", put(cancel_delivery))
        .route("/:id/notes", put(add_notes))
}

/// Parse a path/body value into a validated domain type, or reply 400.
fn parse<T>(value: &str) -> Result<T, axum::response::Response>
where
    T: core::str::FromStr<Err = DomainError>,
{
    value.parse().map_err(errors::domain_error_to_response)
}

fn delivery_json(status: StatusCode, delivery: &Delivery) -> axum::response::Response {
    (status, Json(dto::DeliveryResponse::from_domain(delivery))).into_response()
}

fn delivery_list_json(deliveries: &[Delivery]) -> axum::response::Response {
    let body: Vec<dto::DeliveryResponse> =
        deliveries.iter().map(dto::DeliveryResponse::from_domain).collect();
    (StatusCode::OK, Json(body)).into_response()
}

pub async fn create_delivery(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateDeliveryRequest>,
) -> axum::response::Response {
    let id: DeliveryId = match parse(&body.delivery_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let route_id: RouteId = match parse(&body.route_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let delivery_person_id: DeliveryPersonId = match parse(&body.delivery_person_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let order_number: OrderNumber = match parse(&body.order_number) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.deliveries.create_delivery(
        id,
        route_id,
        delivery_person_id,
        body.address.into_domain(),
        order_number,
        body.scheduled_date,
    ) {
        Ok(delivery) => delivery_json(StatusCode::CREATED, &delivery),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_delivery(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: DeliveryId = match parse(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.deliveries.delivery_by_id(&id) {
        Ok(Some(delivery)) => delivery_json(StatusCode::OK, &delivery),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("delivery {id} not found"),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn deliveries_by_route(
    Extension(services): Extension<Arc<AppServices>>,
    Path(route_id): Path<String>,
) -> axum::response::Response {
    let route_id: RouteId = match parse(&route_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.deliveries.deliveries_by_route(&route_id) {
        Ok(deliveries) => delivery_list_json(&deliveries),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn deliveries_by_delivery_person(
    Extension(services): Extension<Arc<AppServices>>,
    Path(person_id): Path<String>,
) -> axum::response::Response {
    let person_id: DeliveryPersonId = match parse(&person_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.deliveries.deliveries_by_delivery_person(&person_id) {
        Ok(deliveries) => delivery_list_json(&deliveries),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn deliveries_by_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(order_number): Path<String>,
) -> axum::response::Response {
    let order_number: OrderNumber = match parse(&order_number) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.deliveries.deliveries_by_order(&order_number) {
        Ok(deliveries) => delivery_list_json(&deliveries),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn deliveries_by_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(status): Path<String>,
) -> axum::response::Response {
    let status: DeliveryStatus = match parse(&status) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.deliveries.deliveries_by_status(status) {
        Ok(deliveries) => delivery_list_json(&deliveries),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn overdue_deliveries(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.deliveries.overdue_deliveries() {
        Ok(deliveries) => delivery_list_json(&deliveries),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn deliveries_by_date_range(
    Extension(services): Extension<Arc<AppServices>>,
    Query(range): Query<dto::DateRangeQuery>,
) -> axum::response::Response {
    match services
        .deliveries
        .deliveries_by_date_range(range.start, range.end)
    {
        Ok(deliveries) => delivery_list_json(&deliveries),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn update_delivery_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateStatusRequest>,
) -> axum::response::Response {
    let id: DeliveryId = match parse(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let status: DeliveryStatus = match parse(&body.status) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.deliveries.update_delivery_status(&id, status) {
        Ok(delivery) => delivery_json(StatusCode::OK, &delivery),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn mark_in_transit(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: DeliveryId = match parse(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.deliveries.mark_delivery_in_transit(&id) {
        Ok(delivery) => delivery_json(StatusCode::OK, &delivery),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn mark_out_for_delivery(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: DeliveryId = match parse(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.deliveries.mark_delivery_out_for_delivery(&id) {
        Ok(delivery) => delivery_json(StatusCode::OK, &delivery),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn mark_delivered(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: DeliveryId = match parse(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.deliveries.mark_delivery_delivered(&id) {
        Ok(delivery) => delivery_json(StatusCode::OK, &delivery),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn mark_failed(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::ReasonRequest>,
) -> axum::response::Response {
    let id: DeliveryId = match parse(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.deliveries.mark_delivery_failed(&id, &body.reason) {
        Ok(delivery) => delivery_json(StatusCode::OK, &delivery),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn cancel_delivery(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::ReasonRequest>,
) -> axum::response::Response {
    let id: DeliveryId = match parse(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.deliveries.cancel_delivery(&id, &body.reason) {
        Ok(delivery) => delivery_json(StatusCode::OK, &delivery),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn add_notes(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::NotesRequest>,
) -> axum::response::Response {
    let id: DeliveryId = match parse(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.deliveries.add_delivery_notes(&id, &body.notes) {
        Ok(delivery) => delivery_json(StatusCode::OK, &delivery),
        Err(err) => errors::domain_error_to_response(err),
    }
}
