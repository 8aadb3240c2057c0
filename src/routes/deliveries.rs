use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::deliveries::{
        CreateDeliveryRequest, DeliveryCreated, DeliveryList, TrackingResult,
        UpdateDeliveryStatusRequest, UserDeliveryList,
    },
    error::AppResult,
    middleware::auth::AuthContext,
    models::Delivery,
    response::ApiResponse,
    routes::params::{AppJson, Pagination},
    services::delivery_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_delivery))
        .route("/get-order-delivery/{order_id}", get(get_order_delivery))
        .route("/get-by-id/{id}", get(get_delivery))
        .route("/update-status/{id}", put(update_delivery_status))
        .route("/my-deliveries", get(my_deliveries))
        .route("/list", get(list_deliveries))
        .route("/search-tracking/{tracking_number}", get(search_tracking))
}

#[utoipa::path(
    post,
    path = "/api/deliveries/create",
    request_body = CreateDeliveryRequest,
    responses(
        (status = 201, description = "Delivery record created", body = ApiResponse<DeliveryCreated>),
        (status = 400, description = "Missing fields or bad date")
    ),
    tag = "Deliveries"
)]
pub async fn create_delivery(
    State(state): State<AppState>,
    ctx: AuthContext,
    AppJson(payload): AppJson<CreateDeliveryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<DeliveryCreated>>)> {
    let resp = delivery_service::create_delivery(&state, &ctx, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/deliveries/get-order-delivery/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Newest delivery for the order", body = ApiResponse<Delivery>),
        (status = 404, description = "Delivery record not found")
    ),
    tag = "Deliveries"
)]
pub async fn get_order_delivery(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Delivery>>> {
    let resp = delivery_service::get_order_delivery(&state, &ctx, order_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/deliveries/get-by-id/{id}",
    params(("id" = Uuid, Path, description = "Delivery id")),
    responses(
        (status = 200, description = "Delivery", body = ApiResponse<Delivery>),
        (status = 404, description = "Delivery record not found")
    ),
    tag = "Deliveries"
)]
pub async fn get_delivery(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Delivery>>> {
    let resp = delivery_service::get_delivery(&state, &ctx, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/deliveries/update-status/{id}",
    params(("id" = Uuid, Path, description = "Delivery id")),
    request_body = UpdateDeliveryStatusRequest,
    responses(
        (status = 200, description = "Status updated and mirrored"),
        (status = 400, description = "Invalid delivery status"),
        (status = 404, description = "Delivery record not found")
    ),
    tag = "Deliveries"
)]
pub async fn update_delivery_status(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateDeliveryStatusRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let resp = delivery_service::update_delivery_status(&state, &ctx, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/deliveries/my-deliveries",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, default 10, max 100"),
        ("offset" = Option<i64>, Query, description = "Rows to skip, default 0"),
    ),
    responses(
        (status = 200, description = "Caller's deliveries", body = ApiResponse<UserDeliveryList>)
    ),
    tag = "Deliveries"
)]
pub async fn my_deliveries(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<UserDeliveryList>>> {
    let resp = delivery_service::my_deliveries(&state, &ctx, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/deliveries/list",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, default 10, max 100"),
        ("offset" = Option<i64>, Query, description = "Rows to skip, default 0"),
    ),
    responses(
        (status = 200, description = "All deliveries with customer columns", body = ApiResponse<DeliveryList>),
        (status = 403, description = "Access denied")
    ),
    tag = "Deliveries"
)]
pub async fn list_deliveries(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<DeliveryList>>> {
    let resp = delivery_service::list_deliveries(&state, &ctx, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/deliveries/search-tracking/{tracking_number}",
    params(("tracking_number" = String, Path, description = "Public tracking number")),
    responses(
        (status = 200, description = "Delivery with its order", body = ApiResponse<TrackingResult>),
        (status = 404, description = "Tracking number not found")
    ),
    tag = "Deliveries"
)]
pub async fn search_tracking(
    State(state): State<AppState>,
    Path(tracking_number): Path<String>,
) -> AppResult<Json<ApiResponse<TrackingResult>>> {
    let resp = delivery_service::search_tracking(&state, &tracking_number).await?;
    Ok(Json(resp))
}
