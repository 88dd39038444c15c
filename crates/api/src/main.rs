#[tokio::main]
async fn main() {
    parceltrack_observability::init();

    let addr = std::env::var("PARCELTRACK_ADDR").unwrap_or_else(|_| {
        tracing::info!("PARCELTRACK_ADDR not set; using 0.0.0.0:8080");
        "0.0.0.0:8080".to_string()
    });

    let app = parceltrack_api::app::build_app();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listen address");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
