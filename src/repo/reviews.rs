use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{ProductRating, Review, ReviewWithAuthor, ReviewWithProduct};

pub struct NewReview {
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub is_verified_purchase: bool,
}

pub async fn insert(pool: &DbPool, review: NewReview) -> Result<Review, sqlx::Error> {
    sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (id, product_id, user_id, rating, comment, is_verified_purchase)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(review.product_id)
    .bind(review.user_id)
    .bind(review.rating)
    .bind(review.comment)
    .bind(review.is_verified_purchase)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Review>, sqlx::Error> {
    sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn exists_for_user(
    pool: &DbPool,
    product_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM reviews
            WHERE product_id = $1 AND user_id = $2 AND deleted_at IS NULL
        )
        "#,
    )
    .bind(product_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// True when the user has an order containing the product, regardless of the
/// order's status. Only informs the verified-purchase badge.
pub async fn has_purchased(
    pool: &DbPool,
    product_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM order_items i
            JOIN orders o ON o.id = i.order_id
            WHERE i.product_id = $1 AND o.user_id = $2 AND o.deleted_at IS NULL
        )
        "#,
    )
    .bind(product_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn list_for_product(
    pool: &DbPool,
    product_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
    sqlx::query_as::<_, ReviewWithAuthor>(
        r#"
        SELECT r.id, r.product_id, r.user_id, u.first_name, u.last_name,
               r.rating, r.comment, r.is_verified_purchase,
               r.created_at, r.updated_at
        FROM reviews r
        JOIN users u ON u.id = r.user_id
        WHERE r.product_id = $1 AND r.deleted_at IS NULL
        ORDER BY r.created_at DESC, r.id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(product_id)
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
) -> Result<Vec<ReviewWithProduct>, sqlx::Error> {
    sqlx::query_as::<_, ReviewWithProduct>(
        r#"
        SELECT r.id, r.product_id, p.name AS product_name, r.user_id,
               r.rating, r.comment, r.is_verified_purchase,
               r.created_at, r.updated_at
        FROM reviews r
        JOIN products p ON p.id = r.product_id
        WHERE r.user_id = $1 AND r.deleted_at IS NULL
        ORDER BY r.created_at DESC, r.id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn rating_for_product(
    pool: &DbPool,
    product_id: Uuid,
) -> Result<ProductRating, sqlx::Error> {
    sqlx::query_as::<_, ProductRating>(
        r#"
        SELECT ROUND(AVG(rating)::numeric, 1) AS average_rating,
               COUNT(*) AS total_reviews
        FROM reviews
        WHERE product_id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(product_id)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &DbPool,
    id: Uuid,
    rating: i32,
    comment: Option<String>,
) -> Result<Review, sqlx::Error> {
    sqlx::query_as::<_, Review>(
        r#"
        UPDATE reviews
        SET rating = $2, comment = $3, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(rating)
    .bind(comment)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &DbPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
