mod error;
mod routes;
mod state;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use state::AppState;

#[tokio::main]
async fn main() {
    eprintln!("Initializing yardstock SDK...");
    let sdk = yardstock_sdk::AsyncYardstockSdk::builder()
        .build()
        .await
        .expect("Failed to initialize yardstock SDK");
    eprintln!("SDK ready.");

    let state = Arc::new(AppState {
        sdk,
        plate_cache: Mutex::new(HashMap::new()),
    });

    let app = Router::new()
        .route("/api/manifest", get(routes::meta::get_manifest))
        .route("/api/needs", get(routes::needs::list_needs))
        .route("/api/needs/search", get(routes::needs::search_needs))
        .route("/api/needs/plate/{plate}", get(routes::needs::needs_for_plate))
        .route("/api/suggestions", get(routes::needs::suggestions))
        .route("/api/stock/totals", get(routes::stock::totals))
        .route("/api/stock/breakdown", get(routes::stock::breakdown))
        .route("/api/stock/{code}", get(routes::stock::code_info))
        .route("/api/movers", get(routes::prices::movers))
        .route("/api/offers/targeted", post(routes::offers::submit_targeted))
        .route("/api/offers/recent", get(routes::offers::recent))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = "0.0.0.0:3000";
    eprintln!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
