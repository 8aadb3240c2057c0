use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use shoe_store_api::{config::AppConfig, db::create_pool, services::auth_service::hash_password};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let owner_id = ensure_user(
        &pool,
        "owner@shoestore.local",
        "Owner@123",
        "owner",
        "Store",
        "Owner",
    )
    .await?;
    let customer_id = ensure_user(
        &pool,
        "customer@shoestore.local",
        "Customer@123",
        "customer",
        "Demo",
        "Customer",
    )
    .await?;
    seed_catalog(&pool).await?;

    println!("Seed completed. Owner ID: {owner_id}, Customer ID: {customer_id}");
    Ok(())
}

async fn ensure_user(
    pool: &PgPool,
    email: &str,
    password: &str,
    role: &str,
    first_name: &str,
    last_name: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, first_name, last_name, password_hash, role)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(first_name)
    .bind(last_name)
    .bind(&password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let (id,): (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            id
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_catalog(pool: &PgPool) -> anyhow::Result<()> {
    let categories = [
        ("Running", "Road and trail running shoes"),
        ("Sneakers", "Everyday casual wear"),
        ("Formal", "Dress shoes for work and occasions"),
        ("Boots", "Hiking and winter boots"),
    ];

    for (name, description) in categories {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;
    }

    let shoes = [
        (
            "Cloudrunner 2",
            "Lightweight daily trainer with a breathable mesh upper",
            "4500.00",
            40,
            "Running",
            "SKU-CLOUDRUN2",
        ),
        (
            "Trail Grip XT",
            "Aggressive outsole lugs for muddy trails",
            "6200.00",
            25,
            "Running",
            "SKU-TRAILGRIPXT",
        ),
        (
            "Court Classic",
            "Low-top leather sneaker",
            "3800.00",
            60,
            "Sneakers",
            "SKU-COURTCLASSIC",
        ),
        (
            "Canvas Street",
            "Vulcanized canvas everyday shoe",
            "2200.00",
            80,
            "Sneakers",
            "SKU-CANVASSTREET",
        ),
        (
            "Oxford Noir",
            "Full-grain leather oxford",
            "7500.00",
            15,
            "Formal",
            "SKU-OXFORDNOIR",
        ),
        (
            "Derby Brown",
            "Classic derby with a stitched welt",
            "6900.00",
            18,
            "Formal",
            "SKU-DERBYBROWN",
        ),
        (
            "Ridge Hiker",
            "Waterproof ankle boot",
            "8800.00",
            20,
            "Boots",
            "SKU-RIDGEHIKER",
        ),
    ];

    for (name, description, price, stock, category, sku) in shoes {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, stock, category_id, sku)
            VALUES ($1, $2, $3, $4, $5, (SELECT id FROM categories WHERE name = $6), $7)
            ON CONFLICT (sku) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(Decimal::from_str(price)?)
        .bind(stock)
        .bind(category)
        .bind(sku)
        .execute(pool)
        .await?;
    }

    println!("Seeded categories and products");
    Ok(())
}
