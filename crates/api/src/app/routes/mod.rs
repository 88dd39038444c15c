use axum::Router;

pub mod deliveries;
pub mod system;

/// Router for all delivery endpoints.
pub fn router() -> Router {
    Router::new().merge(deliveries::router())
}
