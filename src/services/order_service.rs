use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::{
    dto::orders::{
        CreateOrderRequest, OrderCreated, OrderDetail, OrderList, UpdateOrderStatusRequest,
        UserOrderList,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthContext,
    models::{OrderStatistics, OrderStatus, Role},
    repo::orders::{self, NewOrder, NewOrderItem},
    response::ApiResponse,
    routes::params::Pagination,
    state::AppState,
    validate,
};

pub async fn create_order(
    state: &AppState,
    ctx: &AuthContext,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderCreated>> {
    let user = ctx.require_user()?;

    let CreateOrderRequest {
        items,
        total_amount,
        payment_method,
        shipping_address,
        notes,
    } = payload;

    let mut errors = validate::required(&[
        ("payment_method", payment_method.as_deref()),
        ("shipping_address", shipping_address.as_deref()),
    ]);
    if items.is_none() {
        errors.insert("items".to_string(), "Items is required".to_string());
    }
    if total_amount.is_none() {
        errors.insert(
            "total_amount".to_string(),
            "Total amount is required".to_string(),
        );
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let total_amount = total_amount.unwrap_or_default();
    if !validate::positive(total_amount) {
        return Err(AppError::validation_field(
            "total_amount",
            "Total amount must be positive",
        ));
    }

    let items = items.unwrap_or_default();
    if items.is_empty() {
        return Err(AppError::validation_field(
            "items",
            "Order must contain at least one item",
        ));
    }

    let order = orders::insert(
        &state.pool,
        NewOrder {
            user_id: user.id,
            order_number: build_order_number(),
            total_amount,
            payment_method: validate::sanitize(&payment_method.unwrap_or_default()),
            shipping_address: validate::sanitize(&shipping_address.unwrap_or_default()),
            notes,
        },
    )
    .await?;

    // Items land one by one without a wrapping transaction; a failed insert
    // leaves the order row behind with whatever items made it in.
    for item in items {
        let inserted = orders::insert_item(
            &state.pool,
            NewOrderItem {
                order_id: order.id,
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
                size: item.size,
            },
        )
        .await;

        if let Err(err) = inserted {
            tracing::warn!(order_id = %order.id, error = %err, "order item insert failed");
            return Err(AppError::BadRequest("Failed to add item to order".to_string()));
        }
    }

    tracing::info!(order_id = %order.id, order_number = %order.order_number, "order created");

    Ok(ApiResponse::success(
        "Order created successfully",
        OrderCreated {
            id: order.id,
            order_number: order.order_number,
        },
    ))
}

pub async fn list_orders(
    state: &AppState,
    ctx: &AuthContext,
    pagination: Pagination,
) -> AppResult<ApiResponse<OrderList>> {
    ctx.require_role(Role::Owner)?;

    let (limit, offset) = pagination.normalize();
    let orders = orders::list(&state.pool, limit, offset).await?;

    Ok(ApiResponse::success(
        "Orders retrieved successfully",
        OrderList {
            orders,
            limit,
            offset,
        },
    ))
}

pub async fn my_orders(
    state: &AppState,
    ctx: &AuthContext,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserOrderList>> {
    let user = ctx.require_user()?;

    let (limit, offset) = pagination.normalize();
    let orders = orders::list_for_user(&state.pool, user.id, limit, offset).await?;

    Ok(ApiResponse::success(
        "User orders retrieved successfully",
        UserOrderList {
            orders,
            limit,
            offset,
        },
    ))
}

/// Owners see every order; customers only their own.
pub async fn get_order(
    state: &AppState,
    ctx: &AuthContext,
    id: Uuid,
) -> AppResult<ApiResponse<OrderDetail>> {
    let user = ctx.require_user()?;

    let order = orders::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if user.role != Role::Owner.as_str() && user.id != order.user_id {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    let order_items = orders::items_for_order(&state.pool, id).await?;

    Ok(ApiResponse::success(
        "Order retrieved successfully",
        OrderDetail { order, order_items },
    ))
}

pub async fn update_order_status(
    state: &AppState,
    ctx: &AuthContext,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<()>> {
    ctx.require_role(Role::Owner)?;

    let status = payload
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation_field("status", "Status is required"))?;
    let status = OrderStatus::parse(status)
        .ok_or_else(|| AppError::validation_field("status", "Invalid status"))?;

    let updated = orders::set_status(&state.pool, id, status.as_str()).await?;
    if updated == 0 {
        return Err(AppError::NotFound("Order not found".to_string()));
    }

    tracing::info!(order_id = %id, status = status.as_str(), "order status updated");

    // Mirroring into the payment is best effort; the order update above is
    // already committed and stays reported as a success.
    if let Err(err) = state
        .synchronizer
        .order_status_changed(&state.pool, id, status.as_str())
        .await
    {
        tracing::warn!(order_id = %id, error = %err, "status synchronizer failed");
    }

    Ok(ApiResponse::success("Order status updated successfully", ()))
}

pub async fn order_statistics(
    state: &AppState,
    ctx: &AuthContext,
) -> AppResult<ApiResponse<OrderStatistics>> {
    ctx.require_role(Role::Owner)?;

    let statistics = orders::statistics(&state.pool).await?;

    Ok(ApiResponse::success(
        "Order statistics retrieved successfully",
        statistics,
    ))
}

/// `ORD-<UTC timestamp>-<4 random digits>`, unique enough for a small shop
/// and readable on an invoice.
fn build_order_number() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(1000..=9999);
    format!("ORD-{}-{}", Utc::now().format("%Y%m%d%H%M%S"), suffix)
}
