use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use time::Duration;
use tower_sessions::{Expiry, Session};

use crate::{
    dto::auth::{
        ChangePasswordRequest, LoginData, LoginRequest, RegisterData, RegisterRequest,
        UpdateProfileRequest,
    },
    error::AppResult,
    middleware::auth::{AuthContext, SESSION_EMAIL_KEY, SESSION_ROLE_KEY, SESSION_USER_ID_KEY},
    models::UserProfile,
    response::ApiResponse,
    routes::params::AppJson,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/profile", get(profile))
        .route("/update-profile", put(update_profile))
        .route("/change-password", post(change_password))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<RegisterData>),
        (status = 400, description = "Email already registered"),
        (status = 422, description = "Validation error")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<RegisterData>>)> {
    let resp = auth_service::register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<LoginData>),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account is inactive")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginData>>> {
    let remember_me = payload.remember_me.unwrap_or(false);
    let resp = auth_service::login_user(&state, payload).await?;

    if let Some(data) = &resp.data {
        session.insert(SESSION_USER_ID_KEY, data.user_id).await?;
        session.insert(SESSION_EMAIL_KEY, &data.email).await?;
        session.insert(SESSION_ROLE_KEY, &data.role).await?;
        if remember_me {
            session.set_expiry(Some(Expiry::OnInactivity(Duration::days(7))));
        }
    }

    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Session cleared")),
    tag = "Auth"
)]
pub async fn logout(session: Session) -> AppResult<Json<ApiResponse<()>>> {
    session.flush().await?;
    Ok(Json(ApiResponse::success("Logout successful", ())))
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Authenticated profile", body = ApiResponse<UserProfile>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "User not found")
    ),
    tag = "Auth"
)]
pub async fn profile(ctx: AuthContext) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let resp = auth_service::get_profile(&ctx).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/auth/update-profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserProfile>),
        (status = 400, description = "Email already in use")
    ),
    tag = "Auth"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    ctx: AuthContext,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let resp = auth_service::update_profile(&state, &ctx, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Current password is incorrect"),
        (status = 422, description = "Validation error")
    ),
    tag = "Auth"
)]
pub async fn change_password(
    State(state): State<AppState>,
    ctx: AuthContext,
    AppJson(payload): AppJson<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let resp = auth_service::change_password(&state, &ctx, payload).await?;
    Ok(Json(resp))
}
