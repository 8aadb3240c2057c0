use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{Order, OrderItemDetail, OrderStatistics, OrderWithCustomer};

pub struct NewOrder {
    pub user_id: Uuid,
    pub order_number: String,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub shipping_address: String,
    pub notes: Option<String>,
}

pub struct NewOrderItem {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    pub size: Option<String>,
}

pub async fn insert(pool: &DbPool, order: NewOrder) -> Result<Order, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (id, user_id, order_number, total_amount, payment_method, shipping_address, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(order.user_id)
    .bind(order.order_number)
    .bind(order.total_amount)
    .bind(order.payment_method)
    .bind(order.shipping_address)
    .bind(order.notes)
    .fetch_one(pool)
    .await
}

pub async fn insert_item(pool: &DbPool, item: NewOrderItem) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO order_items (id, order_id, product_id, quantity, price, size)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(item.order_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .bind(item.price)
    .bind(item.size)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(
    pool: &DbPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<OrderWithCustomer>, sqlx::Error> {
    sqlx::query_as::<_, OrderWithCustomer>(
        r#"
        SELECT o.id, o.user_id, o.order_number, o.total_amount, o.status,
               o.payment_method, o.shipping_address, o.notes,
               o.created_at, o.updated_at,
               u.first_name, u.last_name, u.email
        FROM orders o
        JOIN users u ON u.id = o.user_id
        WHERE o.deleted_at IS NULL
        ORDER BY o.created_at DESC, o.id
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
) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        r#"
        SELECT * FROM orders
        WHERE user_id = $1 AND deleted_at IS NULL
        ORDER BY created_at DESC, id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn items_for_order(
    pool: &DbPool,
    order_id: Uuid,
) -> Result<Vec<OrderItemDetail>, sqlx::Error> {
    sqlx::query_as::<_, OrderItemDetail>(
        r#"
        SELECT i.id, i.order_id, i.product_id, p.name AS product_name, p.sku,
               i.quantity, i.price, i.size, i.created_at
        FROM order_items i
        JOIN products p ON p.id = i.product_id
        WHERE i.order_id = $1
        ORDER BY i.created_at, i.id
        "#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await
}

pub async fn set_status(pool: &DbPool, id: Uuid, status: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE orders SET status = $2, updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .bind(status)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn statistics(pool: &DbPool) -> Result<OrderStatistics, sqlx::Error> {
    sqlx::query_as::<_, OrderStatistics>(
        r#"
        SELECT COUNT(*) AS total_orders,
               COALESCE(SUM(total_amount), 0) AS total_revenue,
               COALESCE(AVG(total_amount), 0) AS average_order_value,
               COUNT(*) FILTER (WHERE status = 'completed') AS completed_orders
        FROM orders
        WHERE deleted_at IS NULL
        "#,
    )
    .fetch_one(pool)
    .await
}
