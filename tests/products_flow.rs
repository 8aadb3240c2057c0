mod common;

use std::collections::HashSet;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rust_decimal::Decimal;

use shoe_store_api::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    error::AppError,
    routes::params::{Pagination, ProductListQuery, SearchQuery},
    services::product_service,
};

// 1x1 transparent PNG.
const PIXEL_PNG_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

#[tokio::test]
async fn catalog_crud_pagination_and_image_storage() -> anyhow::Result<()> {
    let Some(state) = common::try_state().await? else {
        return Ok(());
    };

    let owner = common::seed_user(&state, "owner@shoestore.local", "owner").await?;
    let customer = common::seed_user(&state, "ramesh@example.com", "customer").await?;
    let owner_ctx = common::ctx_for(&owner);
    let customer_ctx = common::ctx_for(&customer);

    let category = common::seed_category(&state, "Running").await?;

    // Catalog writes are owner-only.
    let err = product_service::create_product(
        &state,
        &customer_ctx,
        CreateProductRequest {
            name: Some("Volt Racer".to_string()),
            description: Some("Lightweight racing flat".to_string()),
            price: Some(Decimal::from_str("5400.00")?),
            stock: Some(5),
            category_id: Some(category),
            image: None,
            sku: None,
            is_active: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // A data URI image is decoded to disk and the public path is stored in
    // its place.
    let created = product_service::create_product(
        &state,
        &owner_ctx,
        CreateProductRequest {
            name: Some("Volt Racer".to_string()),
            description: Some("Lightweight racing flat".to_string()),
            price: Some(Decimal::from_str("5400.00")?),
            stock: Some(5),
            category_id: Some(category),
            image: Some(format!("data:image/png;base64,{PIXEL_PNG_B64}")),
            sku: None,
            is_active: None,
        },
    )
    .await?
    .data
    .expect("product payload");

    let image_url = created.image_url.clone().expect("image path stored");
    assert!(image_url.starts_with("/uploads/products/"));
    assert!(image_url.ends_with(".png"));
    assert!(!image_url.contains("base64"));
    assert!(created.sku.starts_with("SKU-"));

    let file_name = image_url.rsplit('/').next().expect("file name component");
    let stored = std::fs::read(state.config.upload_dir.join("products").join(file_name))?;
    assert_eq!(stored, STANDARD.decode(PIXEL_PNG_B64)?);

    // The detail view resolves the category and echoes the same path.
    let detail = product_service::get_product(&state, created.id)
        .await?
        .data
        .expect("product detail");
    assert_eq!(detail.category_name.as_deref(), Some("Running"));
    assert_eq!(detail.image_url.as_deref(), Some(image_url.as_str()));

    // Updating without an image keeps the stored one; other fields move.
    let updated = product_service::update_product(
        &state,
        &owner_ctx,
        created.id,
        UpdateProductRequest {
            name: None,
            description: None,
            price: Some(Decimal::from_str("4900.00")?),
            stock: Some(3),
            category_id: None,
            image: None,
            sku: None,
            is_active: None,
        },
    )
    .await?
    .data
    .expect("updated product");
    assert_eq!(updated.price, Decimal::from_str("4900.00")?);
    assert_eq!(updated.stock, 3);
    assert_eq!(updated.image_url.as_deref(), Some(image_url.as_str()));

    // Search matches names case-insensitively; a blank keyword is a
    // validation failure.
    let hits = product_service::search_products(
        &state,
        SearchQuery {
            q: Some("volt".to_string()),
            pagination: Pagination::default(),
        },
    )
    .await?
    .data
    .expect("search results");
    assert_eq!(hits.products.len(), 1);
    assert_eq!(hits.products[0].id, created.id);

    let err = product_service::search_products(
        &state,
        SearchQuery {
            q: Some("   ".to_string()),
            pagination: Pagination::default(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Pages at a fixed limit are disjoint and cover the whole set.
    let boots = common::seed_category(&state, "Boots").await?;
    for (name, price) in [
        ("Ridge Walker", "6400.00"),
        ("Mud Season", "5100.00"),
        ("Summit Line", "8900.00"),
        ("Gorkha Trek", "7300.00"),
        ("Monsoon Proof", "4700.00"),
    ] {
        common::seed_product(&state, name, boots, price).await?;
    }

    let mut seen = HashSet::new();
    for offset in [0_i64, 2, 4] {
        let page = product_service::list_products(
            &state,
            ProductListQuery {
                pagination: Pagination {
                    limit: Some(2),
                    offset: Some(offset),
                },
                category_id: Some(boots),
            },
        )
        .await?
        .data
        .expect("product page");
        assert_eq!(page.total, 5);
        assert_eq!(page.limit, 2);
        assert_eq!(page.offset, offset);
        let expected = if offset == 4 { 1 } else { 2 };
        assert_eq!(page.products.len(), expected);
        for product in page.products {
            assert!(seen.insert(product.id), "pages must not overlap");
        }
    }
    assert_eq!(seen.len(), 5);

    // Soft-deleted products vanish from reads but keep their row.
    product_service::delete_product(&state, &owner_ctx, created.id).await?;
    let err = product_service::get_product(&state, created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let (still_there,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1 AND deleted_at IS NOT NULL)")
            .bind(created.id)
            .fetch_one(&state.pool)
            .await?;
    assert!(still_there);

    let err = product_service::delete_product(&state, &owner_ctx, created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}
