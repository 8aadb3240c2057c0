use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State, multipart::Field},
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::payments::{
        PaymentCreateForm, PaymentCreated, PaymentForm, PaymentList, ScreenshotUpload,
        UpdatePaymentStatusRequest, UserPaymentList,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthContext,
    models::Payment,
    response::ApiResponse,
    routes::params::{AppJson, Pagination},
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_payment))
        .route("/get-order-payment/{order_id}", get(get_order_payment))
        .route("/update-status/{id}", put(update_payment_status))
        .route("/update-by-order/{order_id}", put(update_order_payment_status))
        .route("/my-payments", get(my_payments))
        .route("/list", get(list_payments))
}

#[utoipa::path(
    post,
    path = "/api/payments/create",
    request_body(content = PaymentCreateForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Payment recorded", body = ApiResponse<PaymentCreated>),
        (status = 400, description = "Missing fields, bad method, or bad screenshot")
    ),
    tag = "Payments"
)]
pub async fn create_payment(
    State(state): State<AppState>,
    ctx: AuthContext,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<PaymentCreated>>)> {
    let mut form = PaymentForm::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "order_id" => form.order_id = Some(text_part(field).await?),
            "payment_method" => form.payment_method = Some(text_part(field).await?),
            "amount" => form.amount = Some(text_part(field).await?),
            "payment_screenshot" => {
                let file_name = field.file_name().unwrap_or("screenshot").to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                form.screenshot = Some(ScreenshotUpload { file_name, bytes });
            }
            // Unknown parts are skipped, matching lenient form handling.
            _ => {}
        }
    }

    let resp = payment_service::create_payment(&state, &ctx, form).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/payments/get-order-payment/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Newest payment for the order", body = ApiResponse<Payment>),
        (status = 404, description = "Payment not found")
    ),
    tag = "Payments"
)]
pub async fn get_order_payment(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let resp = payment_service::get_order_payment(&state, &ctx, order_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/payments/update-status/{id}",
    params(("id" = Uuid, Path, description = "Payment id")),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Payment not found")
    ),
    tag = "Payments"
)]
pub async fn update_payment_status(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdatePaymentStatusRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let resp = payment_service::update_payment_status(&state, &ctx, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/payments/update-by-order/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order id")),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 404, description = "Payment not found for this order")
    ),
    tag = "Payments"
)]
pub async fn update_order_payment_status(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(order_id): Path<Uuid>,
    AppJson(payload): AppJson<UpdatePaymentStatusRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let resp =
        payment_service::update_order_payment_status(&state, &ctx, order_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/my-payments",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, default 10, max 100"),
        ("offset" = Option<i64>, Query, description = "Rows to skip, default 0"),
    ),
    responses(
        (status = 200, description = "Caller's payments", body = ApiResponse<UserPaymentList>)
    ),
    tag = "Payments"
)]
pub async fn my_payments(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<UserPaymentList>>> {
    let resp = payment_service::my_payments(&state, &ctx, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/list",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, default 10, max 100"),
        ("offset" = Option<i64>, Query, description = "Rows to skip, default 0"),
    ),
    responses(
        (status = 200, description = "All payments with customer columns", body = ApiResponse<PaymentList>),
        (status = 403, description = "Access denied")
    ),
    tag = "Payments"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<PaymentList>>> {
    let resp = payment_service::list_payments(&state, &ctx, pagination).await?;
    Ok(Json(resp))
}

async fn text_part(field: Field<'_>) -> AppResult<String> {
    field.text().await.map_err(bad_multipart)
}

fn bad_multipart(_: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest("Invalid multipart payload".to_string())
}
