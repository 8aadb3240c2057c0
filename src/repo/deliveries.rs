use chrono::NaiveDate;
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{Delivery, DeliveryWithCustomer};

pub struct NewDelivery {
    pub order_id: Uuid,
    pub tracking_number: String,
    pub delivery_address: Option<String>,
    pub estimated_delivery_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

pub async fn insert(pool: &DbPool, delivery: NewDelivery) -> Result<Delivery, sqlx::Error> {
    sqlx::query_as::<_, Delivery>(
        r#"
        INSERT INTO deliveries (id, order_id, tracking_number, delivery_address, estimated_delivery_date, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(delivery.order_id)
    .bind(delivery.tracking_number)
    .bind(delivery.delivery_address)
    .bind(delivery.estimated_delivery_date)
    .bind(delivery.notes)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Delivery>, sqlx::Error> {
    sqlx::query_as::<_, Delivery>("SELECT * FROM deliveries WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_order(pool: &DbPool, order_id: Uuid) -> Result<Option<Delivery>, sqlx::Error> {
    sqlx::query_as::<_, Delivery>(
        "SELECT * FROM deliveries WHERE order_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_tracking(
    pool: &DbPool,
    tracking_number: &str,
) -> Result<Option<Delivery>, sqlx::Error> {
    sqlx::query_as::<_, Delivery>("SELECT * FROM deliveries WHERE tracking_number = $1")
        .bind(tracking_number)
        .fetch_optional(pool)
        .await
}

pub async fn list(
    pool: &DbPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<DeliveryWithCustomer>, sqlx::Error> {
    sqlx::query_as::<_, DeliveryWithCustomer>(
        r#"
        SELECT d.id, d.order_id, o.order_number, o.total_amount, d.tracking_number,
               d.delivery_address, d.estimated_delivery_date, d.actual_delivery_date,
               d.status, d.notes, d.created_at, d.updated_at,
               u.first_name, u.email
        FROM deliveries d
        JOIN orders o ON o.id = d.order_id
        JOIN users u ON u.id = o.user_id
        ORDER BY d.created_at DESC, d.id
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn list_for_user(
    pool: &DbPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Delivery>, sqlx::Error> {
    sqlx::query_as::<_, Delivery>(
        r#"
        SELECT d.* FROM deliveries d
        JOIN orders o ON o.id = d.order_id
        WHERE o.user_id = $1
        ORDER BY d.created_at DESC, d.id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn set_status(
    pool: &DbPool,
    id: Uuid,
    status: &str,
    actual_delivery_date: Option<NaiveDate>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE deliveries
        SET status = $2, actual_delivery_date = COALESCE($3, actual_delivery_date), updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(actual_delivery_date)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
