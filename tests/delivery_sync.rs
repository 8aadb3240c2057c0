mod common;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use shoe_store_api::{
    db::DbPool,
    dto::deliveries::{CreateDeliveryRequest, UpdateDeliveryStatusRequest},
    error::{AppError, AppResult},
    repo::{deliveries, orders, payments::{self, NewPayment}},
    services::delivery_service,
    sync::StatusSynchronizer,
};

/// Mirrors the status onto the order and then fails, standing in for a
/// payment update that went wrong mid-cascade.
struct PaymentEdgeDown;

#[async_trait]
impl StatusSynchronizer for PaymentEdgeDown {
    async fn order_status_changed(
        &self,
        _pool: &DbPool,
        _order_id: Uuid,
        _status: &str,
    ) -> AppResult<()> {
        Err(AppError::BadRequest("payment edge down".to_string()))
    }

    async fn delivery_status_changed(
        &self,
        pool: &DbPool,
        order_id: Uuid,
        status: &str,
    ) -> AppResult<()> {
        orders::set_status(pool, order_id, status).await?;
        Err(AppError::BadRequest("payment edge down".to_string()))
    }
}

/// Fails before touching anything.
struct SynchronizerDown;

#[async_trait]
impl StatusSynchronizer for SynchronizerDown {
    async fn order_status_changed(
        &self,
        _pool: &DbPool,
        _order_id: Uuid,
        _status: &str,
    ) -> AppResult<()> {
        Err(AppError::BadRequest("synchronizer down".to_string()))
    }

    async fn delivery_status_changed(
        &self,
        _pool: &DbPool,
        _order_id: Uuid,
        _status: &str,
    ) -> AppResult<()> {
        Err(AppError::BadRequest("synchronizer down".to_string()))
    }
}

async fn reset_statuses(state: &shoe_store_api::state::AppState, order_id: Uuid) -> anyhow::Result<()> {
    sqlx::query("UPDATE deliveries SET status = 'pending', actual_delivery_date = NULL WHERE order_id = $1")
        .bind(order_id)
        .execute(&state.pool)
        .await?;
    sqlx::query("UPDATE orders SET status = 'pending' WHERE id = $1")
        .bind(order_id)
        .execute(&state.pool)
        .await?;
    sqlx::query("UPDATE payments SET status = 'pending' WHERE order_id = $1")
        .bind(order_id)
        .execute(&state.pool)
        .await?;
    Ok(())
}

#[tokio::test]
async fn delivery_status_cascades_to_order_and_payment() -> anyhow::Result<()> {
    let Some(state) = common::try_state().await? else {
        return Ok(());
    };

    let owner = common::seed_user(&state, "owner@shoestore.local", "owner").await?;
    let customer = common::seed_user(&state, "nirmala@example.com", "customer").await?;
    let category = common::seed_category(&state, "Boots").await?;
    let product = common::seed_product(&state, "Himal Hiker", category, "7800.00").await?;
    let order_id = common::seed_order(&state, customer.id, product, "7800.00").await?;

    let payment = payments::insert(
        &state.pool,
        NewPayment {
            order_id,
            payment_method: "esewa".to_string(),
            amount: rust_decimal::Decimal::from(7800),
            payment_screenshot: None,
        },
    )
    .await?;

    let owner_ctx = common::ctx_for(&owner);
    let customer_ctx = common::ctx_for(&customer);

    let created = delivery_service::create_delivery(
        &state,
        &customer_ctx,
        CreateDeliveryRequest {
            order_id: Some(order_id),
            estimated_delivery_date: Some("2025-09-01".to_string()),
            delivery_address: Some("Baneshwor, Kathmandu".to_string()),
            notes: None,
        },
    )
    .await?
    .data
    .expect("delivery payload");
    assert!(created.tracking_number.starts_with("TRK"));

    // Unknown statuses are rejected before anything moves.
    let err = delivery_service::update_delivery_status(
        &state,
        &owner_ctx,
        created.id,
        UpdateDeliveryStatusRequest {
            delivery_status: Some("misplaced".to_string()),
            actual_delivery_date: None,
            tracking_number: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "Invalid delivery status"));

    // An intermediate status is copied verbatim onto the order even though
    // it is outside the order vocabulary; the payment stays put.
    delivery_service::update_delivery_status(
        &state,
        &owner_ctx,
        created.id,
        UpdateDeliveryStatusRequest {
            delivery_status: Some("out_for_delivery".to_string()),
            actual_delivery_date: None,
            tracking_number: None,
        },
    )
    .await?;

    let order = orders::find_by_id(&state.pool, order_id).await?.expect("order row");
    assert_eq!(order.status, "out_for_delivery");
    let payment_row = payments::find_by_id(&state.pool, payment.id)
        .await?
        .expect("payment row");
    assert_eq!(payment_row.status, "pending");

    // Delivered mirrors the order, completes the payment, and stamps the
    // actual date. The tracking_number field in the payload is ignored.
    delivery_service::update_delivery_status(
        &state,
        &owner_ctx,
        created.id,
        UpdateDeliveryStatusRequest {
            delivery_status: Some("delivered".to_string()),
            actual_delivery_date: Some("2025-09-03".to_string()),
            tracking_number: Some("TRK-CLIENT-SUPPLIED".to_string()),
        },
    )
    .await?;

    let order = orders::find_by_id(&state.pool, order_id).await?.expect("order row");
    assert_eq!(order.status, "delivered");
    let payment_row = payments::find_by_id(&state.pool, payment.id)
        .await?
        .expect("payment row");
    assert_eq!(payment_row.status, "completed");
    let delivery_row = deliveries::find_by_id(&state.pool, created.id)
        .await?
        .expect("delivery row");
    assert_eq!(delivery_row.status, "delivered");
    assert_eq!(delivery_row.tracking_number, created.tracking_number);
    assert_eq!(
        delivery_row.actual_delivery_date,
        NaiveDate::from_ymd_opt(2025, 9, 3)
    );

    // One failing side update does not fail the primary: the delivery and
    // the order mirror land, the payment stays pending.
    reset_statuses(&state, order_id).await?;
    let partial = state.clone().with_synchronizer(Arc::new(PaymentEdgeDown));
    delivery_service::update_delivery_status(
        &partial,
        &owner_ctx,
        created.id,
        UpdateDeliveryStatusRequest {
            delivery_status: Some("delivered".to_string()),
            actual_delivery_date: None,
            tracking_number: None,
        },
    )
    .await?;

    let delivery_row = deliveries::find_by_id(&state.pool, created.id)
        .await?
        .expect("delivery row");
    assert_eq!(delivery_row.status, "delivered");
    let order = orders::find_by_id(&state.pool, order_id).await?.expect("order row");
    assert_eq!(order.status, "delivered");
    let payment_row = payments::find_by_id(&state.pool, payment.id)
        .await?
        .expect("payment row");
    assert_eq!(payment_row.status, "pending");

    // A synchronizer that fails outright still leaves the delivery update
    // committed and reported as a success.
    reset_statuses(&state, order_id).await?;
    let broken = state.clone().with_synchronizer(Arc::new(SynchronizerDown));
    let response = delivery_service::update_delivery_status(
        &broken,
        &owner_ctx,
        created.id,
        UpdateDeliveryStatusRequest {
            delivery_status: Some("shipped".to_string()),
            actual_delivery_date: None,
            tracking_number: None,
        },
    )
    .await?;
    assert!(response.success);

    let delivery_row = deliveries::find_by_id(&state.pool, created.id)
        .await?
        .expect("delivery row");
    assert_eq!(delivery_row.status, "shipped");
    let order = orders::find_by_id(&state.pool, order_id).await?.expect("order row");
    assert_eq!(order.status, "pending");
    let payment_row = payments::find_by_id(&state.pool, payment.id)
        .await?
        .expect("payment row");
    assert_eq!(payment_row.status, "pending");

    // The public tracking lookup needs no authentication and embeds the
    // order.
    let tracked = delivery_service::search_tracking(&state, &created.tracking_number)
        .await?
        .data
        .expect("tracking payload");
    assert_eq!(tracked.delivery.id, created.id);
    assert_eq!(tracked.order.expect("embedded order").id, order_id);

    Ok(())
}
