use uuid::Uuid;

use crate::{
    dto::reviews::{
        CreateReviewRequest, ReviewCreated, ReviewList, UpdateReviewRequest, UserReviewList,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthContext,
    models::{ProductRating, Role},
    repo::reviews::{self, NewReview},
    response::ApiResponse,
    routes::params::Pagination,
    state::AppState,
    validate,
};

pub async fn create_review(
    state: &AppState,
    ctx: &AuthContext,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<ReviewCreated>> {
    let user = ctx.require_user()?;

    let (Some(product_id), Some(rating)) = (payload.product_id, payload.rating) else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };
    check_rating(rating)?;

    if reviews::exists_for_user(&state.pool, product_id, user.id).await? {
        return Err(AppError::BadRequest(
            "You have already reviewed this product".to_string(),
        ));
    }

    // Buying first is not required; it only earns the verified badge.
    let is_verified_purchase = reviews::has_purchased(&state.pool, product_id, user.id).await?;

    let review = reviews::insert(
        &state.pool,
        NewReview {
            product_id,
            user_id: user.id,
            rating,
            comment: clean_comment(payload.comment),
            is_verified_purchase,
        },
    )
    .await?;

    tracing::info!(review_id = %review.id, product_id = %product_id, "review created");

    Ok(ApiResponse::success(
        "Review created successfully",
        ReviewCreated { id: review.id },
    ))
}

pub async fn product_reviews(
    state: &AppState,
    product_id: Uuid,
    pagination: Pagination,
) -> AppResult<ApiResponse<ReviewList>> {
    let (limit, offset) = pagination.normalize();
    let reviews = reviews::list_for_product(&state.pool, product_id, limit, offset).await?;

    Ok(ApiResponse::success(
        "Reviews retrieved successfully",
        ReviewList {
            reviews,
            limit,
            offset,
        },
    ))
}

pub async fn product_rating(
    state: &AppState,
    product_id: Uuid,
) -> AppResult<ApiResponse<ProductRating>> {
    let rating = reviews::rating_for_product(&state.pool, product_id).await?;

    Ok(ApiResponse::success(
        "Product rating retrieved successfully",
        rating,
    ))
}

/// Only the author may edit; the comment is replaced wholesale, absent means
/// cleared.
pub async fn update_review(
    state: &AppState,
    ctx: &AuthContext,
    id: Uuid,
    payload: UpdateReviewRequest,
) -> AppResult<ApiResponse<()>> {
    let user = ctx.require_user()?;

    let rating = payload
        .rating
        .ok_or_else(|| AppError::BadRequest("Rating is required".to_string()))?;
    check_rating(rating)?;

    let review = reviews::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;
    if review.user_id != user.id {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    reviews::update(&state.pool, id, rating, clean_comment(payload.comment)).await?;

    Ok(ApiResponse::success("Review updated successfully", ()))
}

/// Authors delete their own reviews; owners may delete any.
pub async fn delete_review(
    state: &AppState,
    ctx: &AuthContext,
    id: Uuid,
) -> AppResult<ApiResponse<()>> {
    let user = ctx.require_user()?;

    let review = reviews::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;
    if review.user_id != user.id && user.role != Role::Owner.as_str() {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    reviews::delete(&state.pool, id).await?;

    tracing::info!(review_id = %id, "review deleted");

    Ok(ApiResponse::success("Review deleted successfully", ()))
}

pub async fn my_reviews(
    state: &AppState,
    ctx: &AuthContext,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserReviewList>> {
    let user = ctx.require_user()?;

    let (limit, offset) = pagination.normalize();
    let reviews = reviews::list_for_user(&state.pool, user.id, limit, offset).await?;

    Ok(ApiResponse::success(
        "User reviews retrieved successfully",
        UserReviewList {
            reviews,
            limit,
            offset,
        },
    ))
}

fn check_rating(rating: i32) -> AppResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

fn clean_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|c| validate::sanitize(&c))
        .filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(check_rating(1).is_ok());
        assert!(check_rating(5).is_ok());
        assert!(check_rating(0).is_err());
        assert!(check_rating(6).is_err());
    }

    #[test]
    fn comment_cleanup() {
        assert_eq!(clean_comment(None), None);
        assert_eq!(clean_comment(Some("   ".to_string())), None);
        assert_eq!(
            clean_comment(Some(" great fit <3 ".to_string())),
            Some("great fit &lt;3".to_string())
        );
    }
}
