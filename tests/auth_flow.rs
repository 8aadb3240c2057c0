mod common;

use shoe_store_api::{
    dto::auth::{ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest},
    error::AppError,
    repo::users,
    services::auth_service,
};

fn register_payload(email: &str) -> RegisterRequest {
    RegisterRequest {
        email: Some(email.to_string()),
        first_name: Some("Anita".to_string()),
        last_name: Some("Gurung".to_string()),
        password: Some("Str0ngPass".to_string()),
        password_confirm: Some("Str0ngPass".to_string()),
        phone: Some("9812345678".to_string()),
        role: None,
    }
}

fn login_payload(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: Some(email.to_string()),
        password: Some(password.to_string()),
        remember_me: None,
    }
}

#[tokio::test]
async fn registration_login_and_password_lifecycle() -> anyhow::Result<()> {
    let Some(state) = common::try_state().await? else {
        return Ok(());
    };

    // A fresh registration defaults to the customer role.
    let response = auth_service::register_user(&state, register_payload("anita@example.com")).await?;
    let registered = response.data.expect("registration payload");
    assert_eq!(registered.email, "anita@example.com");

    let profile = users::find_profile(&state.pool, registered.user_id)
        .await?
        .expect("registered user resolves");
    assert_eq!(profile.role, "customer");

    // Re-registering the same email is refused outright.
    let err = auth_service::register_user(&state, register_payload("anita@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "Email already registered"));

    // The stored credential is an argon2 PHC string, never the plaintext.
    let (stored_hash,): (String,) = sqlx::query_as("SELECT password_hash FROM users WHERE id = $1")
        .bind(registered.user_id)
        .fetch_one(&state.pool)
        .await?;
    assert_ne!(stored_hash, "Str0ngPass");
    assert!(stored_hash.starts_with("$argon2"));

    // Correct credentials pass; a wrong password and an unknown email answer
    // with the same message.
    let login = auth_service::login_user(&state, login_payload("anita@example.com", "Str0ngPass"))
        .await?;
    assert_eq!(login.data.expect("login payload").user_id, registered.user_id);

    let err = auth_service::login_user(&state, login_payload("anita@example.com", "WrongPass1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(ref msg) if msg == "Invalid credentials"));

    let err = auth_service::login_user(&state, login_payload("nobody@example.com", "Str0ngPass"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(ref msg) if msg == "Invalid credentials"));

    // Deactivated accounts fail even with the right password.
    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(registered.user_id)
        .execute(&state.pool)
        .await?;
    let err = auth_service::login_user(&state, login_payload("anita@example.com", "Str0ngPass"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(ref msg) if msg == "Account is inactive"));

    sqlx::query("UPDATE users SET is_active = TRUE WHERE id = $1")
        .bind(registered.user_id)
        .execute(&state.pool)
        .await?;

    // Profile reads come straight off the request context.
    let ctx = common::ctx_for(&profile);
    let fetched = auth_service::get_profile(&ctx).await?;
    assert_eq!(fetched.data.expect("profile payload").email, "anita@example.com");

    // Updating only the phone leaves the other fields alone.
    let updated = auth_service::update_profile(
        &state,
        &ctx,
        UpdateProfileRequest {
            email: None,
            first_name: None,
            last_name: None,
            phone: Some("9841000000".to_string()),
        },
    )
    .await?;
    let updated = updated.data.expect("updated profile");
    assert_eq!(updated.phone.as_deref(), Some("9841000000"));
    assert_eq!(updated.first_name, "Anita");

    // Changing the password checks the current one first.
    let err = auth_service::change_password(
        &state,
        &ctx,
        ChangePasswordRequest {
            current_password: Some("WrongPass1".to_string()),
            new_password: Some("N3wSecret".to_string()),
            new_password_confirm: Some("N3wSecret".to_string()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(ref msg) if msg == "Current password is incorrect"));

    auth_service::change_password(
        &state,
        &ctx,
        ChangePasswordRequest {
            current_password: Some("Str0ngPass".to_string()),
            new_password: Some("N3wSecret".to_string()),
            new_password_confirm: Some("N3wSecret".to_string()),
        },
    )
    .await?;

    // Only the new password works from here on.
    assert!(
        auth_service::login_user(&state, login_payload("anita@example.com", "Str0ngPass"))
            .await
            .is_err()
    );
    auth_service::login_user(&state, login_payload("anita@example.com", "N3wSecret")).await?;

    Ok(())
}
