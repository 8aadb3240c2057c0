use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{Payment, PaymentWithCustomer, PaymentWithOrder};

pub struct NewPayment {
    pub order_id: Uuid,
    pub payment_method: String,
    pub amount: Decimal,
    pub payment_screenshot: Option<String>,
}

pub async fn insert(pool: &DbPool, payment: NewPayment) -> Result<Payment, sqlx::Error> {
    sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (id, order_id, payment_method, amount, payment_screenshot)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payment.order_id)
    .bind(payment.payment_method)
    .bind(payment.amount)
    .bind(payment.payment_screenshot)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Latest payment recorded against an order. An order normally carries one
/// payment, but nothing in the schema enforces that, so take the newest.
pub async fn find_by_order(pool: &DbPool, order_id: Uuid) -> Result<Option<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>(
        "SELECT * FROM payments WHERE order_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await
}

pub async fn list(
    pool: &DbPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<PaymentWithCustomer>, sqlx::Error> {
    sqlx::query_as::<_, PaymentWithCustomer>(
        r#"
        SELECT p.id, p.order_id, o.order_number, p.payment_method, p.amount,
               p.payment_screenshot, p.status, p.transaction_id,
               p.created_at, p.updated_at,
               u.first_name, u.email
        FROM payments p
        JOIN orders o ON o.id = p.order_id
        JOIN users u ON u.id = o.user_id
        ORDER BY p.created_at DESC, p.id
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
) -> Result<Vec<PaymentWithOrder>, sqlx::Error> {
    sqlx::query_as::<_, PaymentWithOrder>(
        r#"
        SELECT p.id, p.order_id, o.order_number, p.payment_method, p.amount,
               p.payment_screenshot, p.status, p.transaction_id,
               p.created_at, p.updated_at
        FROM payments p
        JOIN orders o ON o.id = p.order_id
        WHERE o.user_id = $1
        ORDER BY p.created_at DESC, p.id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Updates the status and, when supplied, the gateway transaction id.
pub async fn set_status(
    pool: &DbPool,
    id: Uuid,
    status: &str,
    transaction_id: Option<&str>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE payments
        SET status = $2, transaction_id = COALESCE($3, transaction_id), updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(transaction_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
