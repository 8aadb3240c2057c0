use chrono::{NaiveDate, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::{
    dto::deliveries::{
        CreateDeliveryRequest, DeliveryCreated, DeliveryList, TrackingResult,
        UpdateDeliveryStatusRequest, UserDeliveryList,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthContext,
    models::{Delivery, DeliveryStatus, Role},
    repo::{
        deliveries::{self, NewDelivery},
        orders,
    },
    response::ApiResponse,
    routes::params::Pagination,
    state::AppState,
    validate,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub async fn create_delivery(
    state: &AppState,
    ctx: &AuthContext,
    payload: CreateDeliveryRequest,
) -> AppResult<ApiResponse<DeliveryCreated>> {
    ctx.require()?;

    let CreateDeliveryRequest {
        order_id,
        estimated_delivery_date,
        delivery_address,
        notes,
    } = payload;

    let (Some(order_id), Some(estimated_raw)) = (order_id, estimated_delivery_date) else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };

    let estimated = NaiveDate::parse_from_str(estimated_raw.trim(), DATE_FORMAT)
        .map_err(|_| AppError::BadRequest("Invalid date format".to_string()))?;

    let delivery = deliveries::insert(
        &state.pool,
        NewDelivery {
            order_id,
            tracking_number: build_tracking_number(),
            delivery_address: delivery_address
                .map(|a| validate::sanitize(&a))
                .filter(|a| !a.is_empty()),
            estimated_delivery_date: Some(estimated),
            notes,
        },
    )
    .await?;

    tracing::info!(
        delivery_id = %delivery.id,
        tracking_number = %delivery.tracking_number,
        "delivery created"
    );

    Ok(ApiResponse::success(
        "Delivery record created successfully",
        DeliveryCreated {
            id: delivery.id,
            tracking_number: delivery.tracking_number,
        },
    ))
}

/// Newest delivery attached to the order.
pub async fn get_order_delivery(
    state: &AppState,
    ctx: &AuthContext,
    order_id: Uuid,
) -> AppResult<ApiResponse<Delivery>> {
    ctx.require()?;

    let delivery = deliveries::find_by_order(&state.pool, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Delivery record not found".to_string()))?;

    Ok(ApiResponse::success(
        "Delivery retrieved successfully",
        delivery,
    ))
}

pub async fn get_delivery(
    state: &AppState,
    ctx: &AuthContext,
    id: Uuid,
) -> AppResult<ApiResponse<Delivery>> {
    ctx.require()?;

    let delivery = deliveries::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Delivery record not found".to_string()))?;

    Ok(ApiResponse::success(
        "Delivery retrieved successfully",
        delivery,
    ))
}

pub async fn update_delivery_status(
    state: &AppState,
    ctx: &AuthContext,
    id: Uuid,
    payload: UpdateDeliveryStatusRequest,
) -> AppResult<ApiResponse<()>> {
    ctx.require_role(Role::Owner)?;

    let status = payload
        .delivery_status
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest("Delivery status is required".to_string()))?;
    let status = DeliveryStatus::parse(status)
        .ok_or_else(|| AppError::BadRequest("Invalid delivery status".to_string()))?;

    let actual_date = match payload.actual_delivery_date.as_deref() {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                .map_err(|_| AppError::BadRequest("Invalid date format".to_string()))?,
        ),
        None => None,
    };

    let delivery = deliveries::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Delivery record not found".to_string()))?;

    deliveries::set_status(&state.pool, id, status.as_str(), actual_date).await?;

    tracing::info!(delivery_id = %id, status = status.as_str(), "delivery status updated");

    // The order and payment mirrors are best effort; this update is already
    // committed and stays reported as a success.
    if let Err(err) = state
        .synchronizer
        .delivery_status_changed(&state.pool, delivery.order_id, status.as_str())
        .await
    {
        tracing::warn!(delivery_id = %id, error = %err, "status synchronizer failed");
    }

    Ok(ApiResponse::success(
        "Delivery status updated successfully",
        (),
    ))
}

pub async fn my_deliveries(
    state: &AppState,
    ctx: &AuthContext,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserDeliveryList>> {
    let user = ctx.require_user()?;

    let (limit, offset) = pagination.normalize();
    let deliveries = deliveries::list_for_user(&state.pool, user.id, limit, offset).await?;

    Ok(ApiResponse::success(
        "Deliveries retrieved successfully",
        UserDeliveryList {
            deliveries,
            limit,
            offset,
        },
    ))
}

pub async fn list_deliveries(
    state: &AppState,
    ctx: &AuthContext,
    pagination: Pagination,
) -> AppResult<ApiResponse<DeliveryList>> {
    ctx.require_role(Role::Owner)?;

    let (limit, offset) = pagination.normalize();
    let deliveries = deliveries::list(&state.pool, limit, offset).await?;

    Ok(ApiResponse::success(
        "Deliveries retrieved successfully",
        DeliveryList {
            deliveries,
            limit,
            offset,
        },
    ))
}

/// Public lookup by tracking number, no authentication.
pub async fn search_tracking(
    state: &AppState,
    tracking_number: &str,
) -> AppResult<ApiResponse<TrackingResult>> {
    let delivery = deliveries::find_by_tracking(&state.pool, tracking_number)
        .await?
        .ok_or_else(|| AppError::NotFound("Tracking number not found".to_string()))?;

    let order = orders::find_by_id(&state.pool, delivery.order_id).await?;

    Ok(ApiResponse::success(
        "Tracking information retrieved successfully",
        TrackingResult { delivery, order },
    ))
}

/// `TRK<unix seconds><4 random digits>`.
fn build_tracking_number() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(1000..=9999);
    format!("TRK{}{}", Utc::now().timestamp(), suffix)
}
