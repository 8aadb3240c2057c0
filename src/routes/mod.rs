use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::response::now_stamp;
use crate::state::AppState;

pub mod auth;
pub mod deliveries;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod payments;
pub mod products;
pub mod reviews;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/orders", orders::router())
        .nest("/payments", payments::router())
        .nest("/deliveries", deliveries::router())
        .nest("/reviews", reviews::router())
}

/// Router-wide fallback; unknown paths still answer in the envelope.
pub async fn endpoint_not_found() -> AppError {
    AppError::NotFound("Endpoint not found".to_string())
}

/// Known path, wrong verb.
pub async fn method_not_allowed() -> Response {
    let body = serde_json::json!({
        "success": false,
        "message": "Method not allowed",
        "data": serde_json::Value::Null,
        "timestamp": now_stamp(),
    });
    (StatusCode::METHOD_NOT_ALLOWED, Json(body)).into_response()
}
