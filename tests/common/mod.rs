#![allow(dead_code)]

use std::str::FromStr;

use anyhow::Result;
use rust_decimal::Decimal;
use uuid::Uuid;

use shoe_store_api::{
    config::AppConfig,
    db::create_pool,
    middleware::auth::AuthContext,
    models::UserProfile,
    repo::{
        orders::{self, NewOrder, NewOrderItem},
        products::{self, NewProduct},
        users::{self, NewUser},
    },
    services::auth_service::hash_password,
    state::AppState,
};

/// Connects to the test database and hands back a clean application state.
/// Returns `None` when no database is configured so the suite can be run
/// without one.
pub async fn try_state() -> Result<Option<AppState>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Clean tables between runs.
    sqlx::query(
        "TRUNCATE TABLE reviews, deliveries, payments, order_items, orders, products, categories, users CASCADE",
    )
    .execute(&pool)
    .await?;

    let upload_dir =
        std::env::temp_dir().join(format!("shoe-store-test-{}", Uuid::new_v4().simple()));
    let config = AppConfig {
        database_url,
        host: "127.0.0.1".to_string(),
        port: 0,
        upload_dir,
        upload_url_prefix: "/uploads".to_string(),
        frontend_origin: "http://localhost:5173".to_string(),
    };

    Ok(Some(AppState::new(pool, config)))
}

pub async fn seed_user(state: &AppState, email: &str, role: &str) -> Result<UserProfile> {
    let user = users::insert(
        &state.pool,
        NewUser {
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            phone: None,
            password_hash: hash_password("Secret123")?,
            role: role.to_string(),
        },
    )
    .await?;

    let profile = users::find_profile(&state.pool, user.id)
        .await?
        .expect("seeded user resolves");
    Ok(profile)
}

/// Request context as the auth extractor would have produced it for a
/// session-authenticated user.
pub fn ctx_for(profile: &UserProfile) -> AuthContext {
    AuthContext {
        session_user_id: Some(profile.id),
        bearer_present: false,
        user: Some(profile.clone()),
    }
}

pub async fn seed_category(state: &AppState, name: &str) -> Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO categories (id, name) VALUES ($1, $2)")
        .bind(id)
        .bind(name)
        .execute(&state.pool)
        .await?;
    Ok(id)
}

pub async fn seed_product(
    state: &AppState,
    name: &str,
    category_id: Uuid,
    price: &str,
) -> Result<Uuid> {
    let product = products::insert(
        &state.pool,
        NewProduct {
            name: name.to_string(),
            description: format!("{name} test article"),
            price: Decimal::from_str(price)?,
            stock: 10,
            category_id: Some(category_id),
            image_url: None,
            sku: format!("SKU-{}", Uuid::new_v4().simple().to_string()[..12].to_uppercase()),
            is_active: true,
        },
    )
    .await?;
    Ok(product.id)
}

/// One order with a single line item, straight through the accessors.
pub async fn seed_order(
    state: &AppState,
    user_id: Uuid,
    product_id: Uuid,
    total: &str,
) -> Result<Uuid> {
    let order = orders::insert(
        &state.pool,
        NewOrder {
            user_id,
            order_number: format!("ORD-TEST-{}", Uuid::new_v4().simple()),
            total_amount: Decimal::from_str(total)?,
            payment_method: "esewa".to_string(),
            shipping_address: "Thamel, Kathmandu".to_string(),
            notes: None,
        },
    )
    .await?;

    orders::insert_item(
        &state.pool,
        NewOrderItem {
            order_id: order.id,
            product_id,
            quantity: 1,
            price: Decimal::from_str(total)?,
            size: None,
        },
    )
    .await?;

    Ok(order.id)
}
