use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    db,
    error::{AppError, AppResult},
    response::ApiResponse,
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    status: String,
    database: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API and database reachable", body = ApiResponse<HealthData>),
        (status = 503, description = "Database connection failed")
    ),
    tag = "Health"
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<HealthData>>> {
    if let Err(err) = db::ping(&state.pool).await {
        tracing::error!(error = %err, "health check ping failed");
        return Err(AppError::ServiceUnavailable(
            "Database connection failed".to_string(),
        ));
    }

    let data = HealthData {
        status: "OK".to_string(),
        database: "Connected".to_string(),
    };

    Ok(Json(ApiResponse::success("API is operational", data)))
}
