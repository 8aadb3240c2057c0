use std::str::FromStr;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    dto::payments::{
        PaymentCreated, PaymentForm, PaymentList, UpdatePaymentStatusRequest, UserPaymentList,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthContext,
    models::{Payment, PaymentMethod, PaymentStatus, Role},
    repo::payments::{self, NewPayment},
    response::ApiResponse,
    routes::params::Pagination,
    state::AppState,
    upload,
};

pub async fn create_payment(
    state: &AppState,
    ctx: &AuthContext,
    form: PaymentForm,
) -> AppResult<ApiResponse<PaymentCreated>> {
    ctx.require()?;

    // Multipart text parts arrive as strings; unparseable ids and amounts
    // count as missing.
    let order_id = form
        .order_id
        .as_deref()
        .and_then(|v| Uuid::parse_str(v.trim()).ok());
    let method = form
        .payment_method
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let amount = form
        .amount
        .as_deref()
        .and_then(|v| Decimal::from_str(v.trim()).ok())
        .filter(|v| *v != Decimal::ZERO);

    let (Some(order_id), Some(method), Some(amount)) = (order_id, method, amount) else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };

    let method = PaymentMethod::parse(&method.to_ascii_lowercase())
        .ok_or_else(|| AppError::BadRequest("Invalid payment method".to_string()))?;

    let screenshot_required = method != PaymentMethod::CashOnDelivery;
    if screenshot_required && form.screenshot.is_none() {
        return Err(AppError::BadRequest(
            "Payment screenshot is required for this payment method".to_string(),
        ));
    }

    // A screenshot sent with a cash-on-delivery payment is dropped.
    let payment_screenshot = match form.screenshot {
        Some(shot) if screenshot_required => Some(
            upload::save_payment_screenshot(&state.config, &shot.file_name, &shot.bytes)
                .await?
                .url_path,
        ),
        _ => None,
    };

    let payment = payments::insert(
        &state.pool,
        NewPayment {
            order_id,
            payment_method: method.as_str().to_string(),
            amount,
            payment_screenshot,
        },
    )
    .await?;

    tracing::info!(payment_id = %payment.id, order_id = %order_id, "payment recorded");

    Ok(ApiResponse::success(
        "Payment created successfully",
        PaymentCreated { id: payment.id },
    ))
}

/// Newest payment attached to the order.
pub async fn get_order_payment(
    state: &AppState,
    ctx: &AuthContext,
    order_id: Uuid,
) -> AppResult<ApiResponse<Payment>> {
    ctx.require()?;

    let payment = payments::find_by_order(&state.pool, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

    Ok(ApiResponse::success(
        "Payment retrieved successfully",
        payment,
    ))
}

pub async fn update_payment_status(
    state: &AppState,
    ctx: &AuthContext,
    id: Uuid,
    payload: UpdatePaymentStatusRequest,
) -> AppResult<ApiResponse<()>> {
    ctx.require_role(Role::Owner)?;

    let status = parse_status(payload.status.as_deref())?;
    let updated = payments::set_status(
        &state.pool,
        id,
        status.as_str(),
        payload.transaction_id.as_deref(),
    )
    .await?;
    if updated == 0 {
        return Err(AppError::NotFound("Payment not found".to_string()));
    }

    tracing::info!(payment_id = %id, status = status.as_str(), "payment status updated");

    Ok(ApiResponse::success("Payment status updated successfully", ()))
}

/// Same update addressed by order instead of payment id; useful to clients
/// that never stored the payment id.
pub async fn update_order_payment_status(
    state: &AppState,
    ctx: &AuthContext,
    order_id: Uuid,
    payload: UpdatePaymentStatusRequest,
) -> AppResult<ApiResponse<()>> {
    ctx.require_role(Role::Owner)?;

    let status = parse_status(payload.status.as_deref())?;
    let payment = payments::find_by_order(&state.pool, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment not found for this order".to_string()))?;

    payments::set_status(
        &state.pool,
        payment.id,
        status.as_str(),
        payload.transaction_id.as_deref(),
    )
    .await?;

    tracing::info!(payment_id = %payment.id, order_id = %order_id, status = status.as_str(), "payment status updated");

    Ok(ApiResponse::success("Payment status updated successfully", ()))
}

pub async fn my_payments(
    state: &AppState,
    ctx: &AuthContext,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserPaymentList>> {
    let user = ctx.require_user()?;

    let (limit, offset) = pagination.normalize();
    let payments = payments::list_for_user(&state.pool, user.id, limit, offset).await?;

    Ok(ApiResponse::success(
        "Payments retrieved successfully",
        UserPaymentList {
            payments,
            limit,
            offset,
        },
    ))
}

pub async fn list_payments(
    state: &AppState,
    ctx: &AuthContext,
    pagination: Pagination,
) -> AppResult<ApiResponse<PaymentList>> {
    ctx.require_role(Role::Owner)?;

    let (limit, offset) = pagination.normalize();
    let payments = payments::list(&state.pool, limit, offset).await?;

    Ok(ApiResponse::success(
        "Payments retrieved successfully",
        PaymentList {
            payments,
            limit,
            offset,
        },
    ))
}

fn parse_status(raw: Option<&str>) -> AppResult<PaymentStatus> {
    let raw = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest("Status is required".to_string()))?;
    PaymentStatus::parse(raw).ok_or_else(|| AppError::BadRequest("Invalid status".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_rejects_blank_and_unknown() {
        assert!(matches!(
            parse_status(None),
            Err(AppError::BadRequest(msg)) if msg == "Status is required"
        ));
        assert!(matches!(
            parse_status(Some("  ")),
            Err(AppError::BadRequest(msg)) if msg == "Status is required"
        ));
        assert!(matches!(
            parse_status(Some("refunded")),
            Err(AppError::BadRequest(msg)) if msg == "Invalid status"
        ));
        assert!(matches!(
            parse_status(Some("completed")),
            Ok(PaymentStatus::Completed)
        ));
    }
}
