use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::reviews::{
        CreateReviewRequest, ReviewCreated, ReviewList, UpdateReviewRequest, UserReviewList,
    },
    error::AppResult,
    middleware::auth::AuthContext,
    models::ProductRating,
    response::ApiResponse,
    routes::params::{AppJson, Pagination},
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_review))
        .route("/get-product-reviews/{product_id}", get(product_reviews))
        .route("/get-product-rating/{product_id}", get(product_rating))
        .route("/update/{id}", put(update_review))
        .route("/delete/{id}", delete(delete_review))
        .route("/my-reviews", get(my_reviews))
}

#[utoipa::path(
    post,
    path = "/api/reviews/create",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<ReviewCreated>),
        (status = 400, description = "Bad rating or duplicate review")
    ),
    tag = "Reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    ctx: AuthContext,
    AppJson(payload): AppJson<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReviewCreated>>)> {
    let resp = review_service::create_review(&state, &ctx, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/reviews/get-product-reviews/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product id"),
        ("limit" = Option<i64>, Query, description = "Page size, default 10, max 100"),
        ("offset" = Option<i64>, Query, description = "Rows to skip, default 0"),
    ),
    responses(
        (status = 200, description = "Reviews with author names", body = ApiResponse<ReviewList>)
    ),
    tag = "Reviews"
)]
pub async fn product_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::product_reviews(&state, product_id, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reviews/get-product-rating/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Average rating and count", body = ApiResponse<ProductRating>)
    ),
    tag = "Reviews"
)]
pub async fn product_rating(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductRating>>> {
    let resp = review_service::product_rating(&state, product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/reviews/update/{id}",
    params(("id" = Uuid, Path, description = "Review id")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Review not found")
    ),
    tag = "Reviews"
)]
pub async fn update_review(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateReviewRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let resp = review_service::update_review(&state, &ctx, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/reviews/delete/{id}",
    params(("id" = Uuid, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Review not found")
    ),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let resp = review_service::delete_review(&state, &ctx, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reviews/my-reviews",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, default 10, max 100"),
        ("offset" = Option<i64>, Query, description = "Rows to skip, default 0"),
    ),
    responses(
        (status = 200, description = "Caller's reviews", body = ApiResponse<UserReviewList>)
    ),
    tag = "Reviews"
)]
pub async fn my_reviews(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<UserReviewList>>> {
    let resp = review_service::my_reviews(&state, &ctx, pagination).await?;
    Ok(Json(resp))
}
