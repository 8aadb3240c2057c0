use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::orders::{
        CreateOrderRequest, OrderCreated, OrderDetail, OrderList, UpdateOrderStatusRequest,
        UserOrderList,
    },
    error::AppResult,
    middleware::auth::AuthContext,
    models::OrderStatistics,
    response::ApiResponse,
    routes::params::{AppJson, Pagination},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_order))
        .route("/list", get(list_orders))
        .route("/my-orders", get(my_orders))
        .route("/detail/{id}", get(get_order))
        .route("/update-status/{id}", put(update_order_status))
        .route("/statistics", get(order_statistics))
}

#[utoipa::path(
    post,
    path = "/api/orders/create",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderCreated>),
        (status = 400, description = "Failed to add item to order"),
        (status = 422, description = "Validation error")
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    ctx: AuthContext,
    AppJson(payload): AppJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderCreated>>)> {
    let resp = order_service::create_order(&state, &ctx, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/orders/list",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, default 10, max 100"),
        ("offset" = Option<i64>, Query, description = "Rows to skip, default 0"),
    ),
    responses(
        (status = 200, description = "All orders with customer columns", body = ApiResponse<OrderList>),
        (status = 403, description = "Access denied")
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &ctx, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/my-orders",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, default 10, max 100"),
        ("offset" = Option<i64>, Query, description = "Rows to skip, default 0"),
    ),
    responses(
        (status = 200, description = "Caller's orders", body = ApiResponse<UserOrderList>)
    ),
    tag = "Orders"
)]
pub async fn my_orders(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<UserOrderList>>> {
    let resp = order_service::my_orders(&state, &ctx, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/detail/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with its items", body = ApiResponse<OrderDetail>),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let resp = order_service::get_order(&state, &ctx, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/update-status/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Invalid status")
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let resp = order_service::update_order_status(&state, &ctx, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/statistics",
    responses(
        (status = 200, description = "Order totals", body = ApiResponse<OrderStatistics>),
        (status = 403, description = "Access denied")
    ),
    tag = "Orders"
)]
pub async fn order_statistics(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> AppResult<Json<ApiResponse<OrderStatistics>>> {
    let resp = order_service::order_statistics(&state, &ctx).await?;
    Ok(Json(resp))
}
