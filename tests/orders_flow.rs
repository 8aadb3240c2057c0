mod common;

use std::str::FromStr;

use rust_decimal::Decimal;
use uuid::Uuid;

use shoe_store_api::{
    dto::{
        orders::{CreateOrderItem, CreateOrderRequest, UpdateOrderStatusRequest},
        payments::PaymentForm,
    },
    error::AppError,
    repo::{
        deliveries::{self, NewDelivery},
        payments,
    },
    routes::params::Pagination,
    services::{order_service, payment_service},
};

#[tokio::test]
async fn order_lifecycle_mirrors_payment_but_not_delivery() -> anyhow::Result<()> {
    let Some(state) = common::try_state().await? else {
        return Ok(());
    };

    let owner = common::seed_user(&state, "owner@shoestore.local", "owner").await?;
    let customer = common::seed_user(&state, "kiran@example.com", "customer").await?;
    let category = common::seed_category(&state, "Running").await?;
    let product_a = common::seed_product(&state, "Cloudrunner 2", category, "4500.00").await?;
    let product_b = common::seed_product(&state, "Trail Grip XT", category, "6200.00").await?;

    let owner_ctx = common::ctx_for(&owner);
    let customer_ctx = common::ctx_for(&customer);

    // The claimed total deliberately disagrees with the item sum (10700); it
    // is stored as sent, never recomputed.
    let claimed_total = Decimal::from_str("9900.00")?;
    let response = order_service::create_order(
        &state,
        &customer_ctx,
        CreateOrderRequest {
            items: Some(vec![
                CreateOrderItem {
                    product_id: product_a,
                    quantity: 1,
                    price: Decimal::from_str("4500.00")?,
                    size: Some("42".to_string()),
                },
                CreateOrderItem {
                    product_id: product_b,
                    quantity: 1,
                    price: Decimal::from_str("6200.00")?,
                    size: None,
                },
            ]),
            total_amount: Some(claimed_total),
            payment_method: Some("esewa".to_string()),
            shipping_address: Some("Patan, Lalitpur".to_string()),
            notes: None,
        },
    )
    .await?;
    let created = response.data.expect("order payload");
    assert!(created.order_number.starts_with("ORD-"));

    // One order row, one item row per line.
    let (order_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(order_count, 1);
    let (item_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM order_items WHERE order_id = $1")
        .bind(created.id)
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(item_count, 2);

    let detail = order_service::get_order(&state, &customer_ctx, created.id)
        .await?
        .data
        .expect("order detail");
    assert_eq!(detail.order.total_amount, claimed_total);
    assert_eq!(detail.order.status, "pending");
    assert_eq!(detail.order_items.len(), 2);
    let names: Vec<&str> = detail
        .order_items
        .iter()
        .map(|item| item.product_name.as_str())
        .collect();
    assert!(names.contains(&"Cloudrunner 2") && names.contains(&"Trail Grip XT"));

    // Customers only see their own orders; owners see every one.
    let outsider = common::seed_user(&state, "outsider@example.com", "customer").await?;
    let outsider_ctx = common::ctx_for(&outsider);
    let err = order_service::get_order(&state, &outsider_ctx, created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    order_service::get_order(&state, &owner_ctx, created.id).await?;

    let mine = order_service::my_orders(&state, &customer_ctx, Pagination::default())
        .await?
        .data
        .expect("user orders");
    assert_eq!(mine.orders.len(), 1);
    let theirs = order_service::my_orders(&state, &outsider_ctx, Pagination::default())
        .await?
        .data
        .expect("user orders");
    assert!(theirs.orders.is_empty());

    // Attach a cash-on-delivery payment (no screenshot needed) and a
    // delivery record.
    let payment_id = payment_service::create_payment(
        &state,
        &customer_ctx,
        PaymentForm {
            order_id: Some(created.id.to_string()),
            payment_method: Some("cash-on-delivery".to_string()),
            amount: Some("9900.00".to_string()),
            screenshot: None,
        },
    )
    .await?
    .data
    .expect("payment payload")
    .id;

    deliveries::insert(
        &state.pool,
        NewDelivery {
            order_id: created.id,
            tracking_number: format!("TRK{}", Uuid::new_v4().simple()),
            delivery_address: None,
            estimated_delivery_date: None,
            notes: None,
        },
    )
    .await?;

    // Status values outside the order vocabulary are rejected at the
    // endpoint; "completed" only ever arrives via the delivery mirror.
    let err = order_service::update_order_status(
        &state,
        &owner_ctx,
        created.id,
        UpdateOrderStatusRequest {
            status: Some("completed".to_string()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Marking the order delivered completes its payment but leaves the
    // delivery record untouched; nothing propagates order -> delivery.
    order_service::update_order_status(
        &state,
        &owner_ctx,
        created.id,
        UpdateOrderStatusRequest {
            status: Some("delivered".to_string()),
        },
    )
    .await?;

    let payment = payments::find_by_id(&state.pool, payment_id)
        .await?
        .expect("payment row");
    assert_eq!(payment.status, "completed");

    let delivery = deliveries::find_by_order(&state.pool, created.id)
        .await?
        .expect("delivery row");
    assert_eq!(delivery.status, "pending");

    // Statistics count every order; completed_orders only counts the literal
    // 'completed' status, which the endpoint above cannot produce.
    let stats = order_service::order_statistics(&state, &owner_ctx)
        .await?
        .data
        .expect("statistics");
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.total_revenue, claimed_total);
    assert_eq!(stats.completed_orders, 0);

    // The full listing is owner-only.
    let err = order_service::list_orders(&state, &customer_ctx, Pagination::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let all = order_service::list_orders(&state, &owner_ctx, Pagination::default())
        .await?
        .data
        .expect("order listing");
    assert_eq!(all.orders.len(), 1);
    assert_eq!(all.orders[0].email, "kiran@example.com");

    Ok(())
}
