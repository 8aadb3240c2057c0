use uuid::Uuid;

use crate::{
    dto::products::{
        CreateProductRequest, ProductList, ProductSearchResults, UpdateProductRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthContext,
    models::{Product, ProductWithCategory, Role},
    repo::products::{self, NewProduct},
    response::ApiResponse,
    routes::params::{ProductListQuery, SearchQuery},
    state::AppState,
    upload, validate,
};

pub async fn list_products(
    state: &AppState,
    query: ProductListQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (limit, offset) = query.pagination.normalize();
    let products = products::list(&state.pool, limit, offset, query.category_id).await?;
    let total = products::count(&state.pool, query.category_id).await?;

    Ok(ApiResponse::success(
        "Products retrieved successfully",
        ProductList {
            products,
            limit,
            offset,
            total,
        },
    ))
}

pub async fn search_products(
    state: &AppState,
    query: SearchQuery,
) -> AppResult<ApiResponse<ProductSearchResults>> {
    let keyword = query.q.as_deref().map(str::trim).unwrap_or_default();
    if keyword.is_empty() {
        return Err(AppError::validation_field("q", "Search keyword is required"));
    }

    let (limit, offset) = query.pagination.normalize();
    let products = products::search(&state.pool, keyword, limit, offset).await?;

    Ok(ApiResponse::success(
        "Search results retrieved successfully",
        ProductSearchResults { products },
    ))
}

pub async fn get_product(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<ProductWithCategory>> {
    let product = products::find_with_category(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(ApiResponse::success(
        "Product retrieved successfully",
        product,
    ))
}

pub async fn create_product(
    state: &AppState,
    ctx: &AuthContext,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ctx.require_role(Role::Owner)?;

    let CreateProductRequest {
        name,
        description,
        price,
        stock,
        category_id,
        image,
        sku,
        is_active,
    } = payload;

    let mut errors = validate::required(&[
        ("name", name.as_deref()),
        ("description", description.as_deref()),
    ]);
    if price.is_none() {
        errors.insert("price".to_string(), "Price is required".to_string());
    }
    if stock.is_none() {
        errors.insert("stock".to_string(), "Stock is required".to_string());
    }
    if category_id.is_none() {
        errors.insert(
            "category_id".to_string(),
            "Category id is required".to_string(),
        );
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let price = price.unwrap_or_default();
    if !validate::positive(price) {
        return Err(AppError::validation_field(
            "price",
            "Price must be a positive number",
        ));
    }
    let stock = stock.unwrap_or_default();
    if stock < 0 {
        return Err(AppError::validation_field(
            "stock",
            "Stock must be a non-negative number",
        ));
    }

    let image_url = match image.as_deref() {
        Some(image) if !image.is_empty() => {
            Some(upload::save_product_image(&state.config, image).await?.url_path)
        }
        _ => None,
    };

    let sku = match sku.as_deref().map(str::trim) {
        Some(sku) if !sku.is_empty() => validate::sanitize(sku),
        _ => generate_sku(),
    };

    let product = products::insert(
        &state.pool,
        NewProduct {
            name: validate::sanitize(&name.unwrap_or_default()),
            description: validate::sanitize(&description.unwrap_or_default()),
            price,
            stock,
            category_id,
            image_url,
            sku,
            is_active: is_active.unwrap_or(true),
        },
    )
    .await?;

    tracing::info!(product_id = %product.id, sku = %product.sku, "product created");

    Ok(ApiResponse::success("Product created successfully", product))
}

pub async fn update_product(
    state: &AppState,
    ctx: &AuthContext,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ctx.require_role(Role::Owner)?;

    if let Some(price) = payload.price {
        if !validate::positive(price) {
            return Err(AppError::validation_field(
                "price",
                "Price must be a positive number",
            ));
        }
    }
    if let Some(stock) = payload.stock {
        if stock < 0 {
            return Err(AppError::validation_field(
                "stock",
                "Stock must be a non-negative number",
            ));
        }
    }

    let existing = products::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    // Absent fields keep their stored values; only a fresh data URI replaces
    // the image.
    let image_url = match payload.image.as_deref() {
        Some(image) if !image.is_empty() => {
            Some(upload::save_product_image(&state.config, image).await?.url_path)
        }
        _ => existing.image_url.clone(),
    };

    let product = products::update(
        &state.pool,
        id,
        sanitized_or(payload.name.as_deref(), &existing.name),
        sanitized_or(payload.description.as_deref(), &existing.description),
        payload.price.unwrap_or(existing.price),
        payload.stock.unwrap_or(existing.stock),
        payload.category_id.or(existing.category_id),
        image_url,
        sanitized_or(payload.sku.as_deref(), &existing.sku),
        payload.is_active.unwrap_or(existing.is_active),
    )
    .await?;

    Ok(ApiResponse::success("Product updated successfully", product))
}

pub async fn delete_product(
    state: &AppState,
    ctx: &AuthContext,
    id: Uuid,
) -> AppResult<ApiResponse<()>> {
    ctx.require_role(Role::Owner)?;

    let deleted = products::soft_delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    tracing::info!(product_id = %id, "product soft-deleted");

    Ok(ApiResponse::success("Product deleted successfully", ()))
}

fn generate_sku() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("SKU-{}", token[..12].to_ascii_uppercase())
}

fn sanitized_or(candidate: Option<&str>, current: &str) -> String {
    match candidate.map(validate::sanitize) {
        Some(value) if !value.is_empty() => value,
        _ => current.to_string(),
    }
}
