use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::{
    dto::auth::{
        ChangePasswordRequest, LoginData, LoginRequest, RegisterData, RegisterRequest,
        UpdateProfileRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthContext,
    models::{Role, UserProfile},
    repo::users::{self, NewUser},
    response::ApiResponse,
    state::AppState,
    validate,
};

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<RegisterData>> {
    let RegisterRequest {
        email,
        first_name,
        last_name,
        password,
        password_confirm,
        phone,
        role,
    } = payload;

    let errors = validate::required(&[
        ("email", email.as_deref()),
        ("first_name", first_name.as_deref()),
        ("last_name", last_name.as_deref()),
        ("password", password.as_deref()),
        ("password_confirm", password_confirm.as_deref()),
    ]);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let email = email.unwrap_or_default().trim().to_string();
    if !validate::email(&email) {
        return Err(AppError::validation_field("email", "Invalid email format"));
    }

    if users::find_id_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::BadRequest("Email already registered".to_string()));
    }

    let password = password.unwrap_or_default();
    if !validate::password(&password) {
        return Err(AppError::validation_field(
            "password",
            "Password must be at least 8 characters with uppercase, lowercase, and number",
        ));
    }
    if password_confirm.unwrap_or_default() != password {
        return Err(AppError::validation_field(
            "password_confirm",
            "Passwords do not match",
        ));
    }

    let phone = phone.as_deref().map(str::trim).filter(|p| !p.is_empty());
    if let Some(phone) = phone {
        if !validate::phone(phone) {
            return Err(AppError::validation_field("phone", "Invalid phone number"));
        }
    }

    // Unknown role strings fall back to customer rather than erroring, so the
    // public endpoint cannot be probed for accepted roles.
    let role = role
        .as_deref()
        .and_then(Role::parse)
        .unwrap_or(Role::Customer);

    let user = users::insert(
        &state.pool,
        NewUser {
            email,
            first_name: validate::sanitize(&first_name.unwrap_or_default()),
            last_name: validate::sanitize(&last_name.unwrap_or_default()),
            phone: phone.map(str::to_string),
            password_hash: hash_password(&password)?,
            role: role.as_str().to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(ApiResponse::success(
        "User registered successfully",
        RegisterData {
            user_id: user.id,
            email: user.email,
        },
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginData>> {
    let LoginRequest {
        email, password, ..
    } = payload;

    let errors = validate::required(&[
        ("email", email.as_deref()),
        ("password", password.as_deref()),
    ]);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let email = email.unwrap_or_default();
    let user = match users::find_by_email(&state.pool, email.trim()).await? {
        Some(user) => user,
        None => return Err(AppError::Unauthorized("Invalid credentials".to_string())),
    };

    if !verify_password(&password.unwrap_or_default(), &user.password_hash) {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    if !user.is_active {
        return Err(AppError::Forbidden("Account is inactive".to_string()));
    }

    tracing::debug!(user_id = %user.id, "credentials accepted");

    Ok(ApiResponse::success(
        "Login successful",
        LoginData {
            user_id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        },
    ))
}

/// The profile is already resolved on the context; a session whose user has
/// since vanished answers 404.
pub async fn get_profile(ctx: &AuthContext) -> AppResult<ApiResponse<UserProfile>> {
    ctx.require()?;
    let profile = ctx
        .user()
        .cloned()
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::success(
        "Profile retrieved successfully",
        profile,
    ))
}

pub async fn update_profile(
    state: &AppState,
    ctx: &AuthContext,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<UserProfile>> {
    ctx.require()?;
    let current = ctx
        .user()
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    // Email is only validated when it actually changes.
    let email = match payload.email.as_deref() {
        Some(email) if email != current.email => {
            if !validate::email(email) {
                return Err(AppError::validation_field("email", "Invalid email format"));
            }
            if users::email_taken_by_other(&state.pool, email, current.id).await? {
                return Err(AppError::BadRequest("Email already in use".to_string()));
            }
            email.to_string()
        }
        _ => current.email.clone(),
    };

    let first_name = sanitized_or(payload.first_name.as_deref(), &current.first_name);
    let last_name = sanitized_or(payload.last_name.as_deref(), &current.last_name);
    let phone = match payload.phone.as_deref() {
        Some(phone) => Some(validate::sanitize(phone)).filter(|p| !p.is_empty()),
        None => current.phone.clone(),
    };

    let updated = users::update_profile(
        &state.pool,
        current.id,
        &email,
        &first_name,
        &last_name,
        phone.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::success("Profile updated successfully", updated))
}

pub async fn change_password(
    state: &AppState,
    ctx: &AuthContext,
    payload: ChangePasswordRequest,
) -> AppResult<ApiResponse<()>> {
    ctx.require()?;
    let profile = ctx
        .user()
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let ChangePasswordRequest {
        current_password,
        new_password,
        new_password_confirm,
    } = payload;

    let errors = validate::required(&[
        ("current_password", current_password.as_deref()),
        ("new_password", new_password.as_deref()),
        ("new_password_confirm", new_password_confirm.as_deref()),
    ]);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    // The context profile carries no hash; fetch the full row for the check.
    let user = users::find_by_id(&state.pool, profile.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !verify_password(&current_password.unwrap_or_default(), &user.password_hash) {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let new_password = new_password.unwrap_or_default();
    if !validate::password(&new_password) {
        return Err(AppError::validation_field(
            "new_password",
            "Password must be at least 8 characters with uppercase, lowercase, and number",
        ));
    }
    if new_password_confirm.unwrap_or_default() != new_password {
        return Err(AppError::validation_field(
            "new_password_confirm",
            "Passwords do not match",
        ));
    }

    users::set_password(&state.pool, user.id, &hash_password(&new_password)?).await?;

    tracing::info!(user_id = %user.id, "password changed");

    Ok(ApiResponse::success("Password changed successfully", ()))
}

/// Argon2id with a fresh per-hash salt. Also used by the seeding binary.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn sanitized_or(candidate: Option<&str>, current: &str) -> String {
    match candidate.map(validate::sanitize) {
        Some(value) if !value.is_empty() => value,
        _ => current.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("Secret123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Secret123", &hash));
        assert!(!verify_password("secret123", &hash));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!verify_password("Secret123", "not-a-phc-string"));
    }

    #[test]
    fn sanitized_or_keeps_current_on_blank_input() {
        assert_eq!(sanitized_or(Some("  "), "Asha"), "Asha");
        assert_eq!(sanitized_or(None, "Asha"), "Asha");
        assert_eq!(sanitized_or(Some(" Binod "), "Asha"), "Binod");
    }
}
