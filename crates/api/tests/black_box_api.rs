use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = parceltrack_api::app::build_app();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn create_body(id: &str, scheduled_date: chrono::DateTime<Utc>) -> Value {
    json!({
        "delivery_id": id,
        "route_id": "R1",
        "delivery_person_id": "P1",
        "order_number": "ORD-77",
        "scheduled_date": scheduled_date,
        "address": {
            "street": "5 Pier Ln",
            "city": "Harborview",
            "postal_code": "11201",
            "country": "US"
        }
    })
}

#[tokio::test]
async fn delivery_lifecycle_over_http() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/deliveries", server.base_url))
        .json(&create_body("D1", Utc::now() + Duration::days(1)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "SCHEDULED");
    assert!(body["actual_delivery_date"].is_null());

    let resp = client
        .put(format!("{}/deliveries/D1/in-transit", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "IN_TRANSIT");

    // Delivered straight from IN_TRANSIT is an illegal transition.
    let resp = client
        .put(format!("{}/deliveries/D1/delivered", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "invalid_transition");

    let resp = client
        .put(format!("{}/deliveries/D1/out-for-delivery", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .put(format!("{}/deliveries/D1/delivered", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "DELIVERED");
    assert!(!body["actual_delivery_date"].is_null());

    let resp = client
        .get(format!("{}/deliveries/D1", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "DELIVERED");
}

#[tokio::test]
async fn duplicate_creation_and_bad_input_are_client_errors() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/deliveries", server.base_url))
        .json(&create_body("D1", Utc::now() + Duration::days(1)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{}/deliveries", server.base_url))
        .json(&create_body("D1", Utc::now() + Duration::days(1)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "already_exists");

    // Blank identifier fails validation.
    let resp = client
        .post(format!("{}/deliveries", server.base_url))
        .json(&create_body("   ", Utc::now() + Duration::days(1)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Blank notes fail validation.
    let resp = client
        .put(format!("{}/deliveries/D1/notes", server.base_url))
        .json(&json!({ "notes": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Unknown delivery is a 404.
    let resp = client
        .put(format!("{}/deliveries/missing/in-transit", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .get(format!("{}/deliveries/missing", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancellation_records_the_reason() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/deliveries", server.base_url))
        .json(&create_body("D1", Utc::now() + Duration::days(1)))
        .send()
        .await
        .unwrap();

    let resp = client
        .put(format!("{}/deliveries/D1/cancel", server.base_url))
        .json(&json!({ "reason": "customer request" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "CANCELLED");
    assert_eq!(body["notes"], "customer request");

    // A cancelled delivery cannot be cancelled again.
    let resp = client
        .put(format!("{}/deliveries/D1/cancel", server.base_url))
        .json(&json!({ "reason": "again" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn query_endpoints_filter_by_key() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // One delivery already past its scheduled date, one comfortably ahead.
    client
        .post(format!("{}/deliveries", server.base_url))
        .json(&create_body("late", Utc::now() - Duration::hours(3)))
        .send()
        .await
        .unwrap();
    client
        .post(format!("{}/deliveries", server.base_url))
        .json(&create_body("on-time", Utc::now() + Duration::days(3)))
        .send()
        .await
        .unwrap();

    let resp = client
        .get(format!("{}/deliveries/status/SCHEDULED", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);

    let resp = client
        .get(format!("{}/deliveries/route/R1", server.base_url))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);

    let resp = client
        .get(format!("{}/deliveries/order/ORD-77", server.base_url))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);

    let resp = client
        .get(format!("{}/deliveries/overdue", server.base_url))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let overdue = body.as_array().unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0]["delivery_id"], "late");

    let start = (Utc::now() - Duration::days(1)).to_rfc3339();
    let end = Utc::now().to_rfc3339();
    let resp = client
        .get(format!("{}/deliveries/date-range", server.base_url))
        .query(&[("start", start.as_str()), ("end", end.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    let window = body.as_array().unwrap();
    assert_eq!(window.len(), 1);
    assert_eq!(window[0]["delivery_id"], "late");

    let resp = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
