use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{User, UserProfile};

// Soft-deleted accounts are invisible to every accessor here.

const PROFILE_COLUMNS: &str = "id, email, first_name, last_name, phone, role, created_at";

pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: String,
}

pub async fn insert(pool: &DbPool, user: NewUser) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, first_name, last_name, phone, password_hash, role)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.email)
    .bind(user.first_name)
    .bind(user.last_name)
    .bind(user.phone)
    .bind(user.password_hash)
    .bind(user.role)
    .fetch_one(pool)
    .await
}

pub async fn find_id_by_email(pool: &DbPool, email: &str) -> Result<Option<Uuid>, sqlx::Error> {
    let row: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = $1 AND deleted_at IS NULL")
            .bind(email)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(id,)| id))
}

/// Duplicate check for profile updates: does another account hold this email?
pub async fn email_taken_by_other(
    pool: &DbPool,
    email: &str,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM users WHERE email = $1 AND id <> $2 AND deleted_at IS NULL",
    )
    .bind(email)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}

pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1 AND deleted_at IS NULL")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_profile(pool: &DbPool, id: Uuid) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn update_profile(
    pool: &DbPool,
    id: Uuid,
    email: &str,
    first_name: &str,
    last_name: &str,
    phone: Option<&str>,
) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(&format!(
        r#"
        UPDATE users
        SET email = $2, first_name = $3, last_name = $4, phone = $5, updated_at = now()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(email)
    .bind(first_name)
    .bind(last_name)
    .bind(phone)
    .fetch_optional(pool)
    .await
}

pub async fn set_password(pool: &DbPool, id: Uuid, password_hash: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .bind(password_hash)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
