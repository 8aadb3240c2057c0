use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{Product, ProductSearchHit, ProductWithCategory};

const WITH_CATEGORY: &str = r#"
    SELECT p.id, p.name, p.description, p.price, p.stock, p.category_id,
           c.name AS category_name, p.image_url, p.sku, p.is_active,
           p.created_at, p.updated_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub sku: String,
    pub is_active: bool,
}

pub async fn insert(pool: &DbPool, product: NewProduct) -> Result<Product, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (id, name, description, price, stock, category_id, image_url, sku, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(product.name)
    .bind(product.description)
    .bind(product.price)
    .bind(product.stock)
    .bind(product.category_id)
    .bind(product.image_url)
    .bind(product.sku)
    .bind(product.is_active)
    .fetch_one(pool)
    .await
}

/// Storefront listing: active, not deleted, newest first, optionally scoped
/// to a category.
pub async fn list(
    pool: &DbPool,
    limit: i64,
    offset: i64,
    category_id: Option<Uuid>,
) -> Result<Vec<ProductWithCategory>, sqlx::Error> {
    sqlx::query_as::<_, ProductWithCategory>(&format!(
        r#"
        {WITH_CATEGORY}
        WHERE p.is_active = TRUE AND p.deleted_at IS NULL
          AND ($3::uuid IS NULL OR p.category_id = $3)
        ORDER BY p.created_at DESC, p.id
        LIMIT $1 OFFSET $2
        "#
    ))
    .bind(limit)
    .bind(offset)
    .bind(category_id)
    .fetch_all(pool)
    .await
}

/// Row count behind [`list`], for the listing envelope's `total`.
pub async fn count(pool: &DbPool, category_id: Option<Uuid>) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM products
        WHERE is_active = TRUE AND deleted_at IS NULL
          AND ($1::uuid IS NULL OR category_id = $1)
        "#,
    )
    .bind(category_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn search(
    pool: &DbPool,
    keyword: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<ProductSearchHit>, sqlx::Error> {
    sqlx::query_as::<_, ProductSearchHit>(
        r#"
        SELECT id, name, price, image_url
        FROM products
        WHERE (name ILIKE $1 OR description ILIKE $1)
          AND is_active = TRUE AND deleted_at IS NULL
        ORDER BY name, id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(format!("%{keyword}%"))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn find_with_category(
    pool: &DbPool,
    id: Uuid,
) -> Result<Option<ProductWithCategory>, sqlx::Error> {
    sqlx::query_as::<_, ProductWithCategory>(&format!(
        "{WITH_CATEGORY} WHERE p.id = $1 AND p.deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[allow(clippy::too_many_arguments)]
pub async fn update(
    pool: &DbPool,
    id: Uuid,
    name: String,
    description: String,
    price: Decimal,
    stock: i32,
    category_id: Option<Uuid>,
    image_url: Option<String>,
    sku: String,
    is_active: bool,
) -> Result<Product, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET name = $2, description = $3, price = $4, stock = $5, category_id = $6,
            image_url = $7, sku = $8, is_active = $9, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(price)
    .bind(stock)
    .bind(category_id)
    .bind(image_url)
    .bind(sku)
    .bind(is_active)
    .fetch_one(pool)
    .await
}

pub async fn soft_delete(pool: &DbPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE products SET deleted_at = now(), updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
