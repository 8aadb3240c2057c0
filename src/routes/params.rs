use axum::extract::{FromRequest, Request, rejection::JsonRejection};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// `limit`/`offset` query pair shared by every listing endpoint.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    /// Applies the listing defaults: limit 10 clamped to 1..=100, offset
    /// floored at zero. Returns `(limit, offset)` ready for the queries.
    pub fn normalize(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(10).clamp(1, 100);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SearchQuery {
    /// Keyword matched against product names and descriptions.
    pub q: Option<String>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

/// [`axum::Json`] with the rejection folded into the response envelope, so
/// malformed bodies come back as a 400 instead of axum's plain-text reply.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|_| AppError::BadRequest("Invalid JSON input".to_string()))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let (limit, offset) = Pagination::default().normalize();
        assert_eq!((limit, offset), (10, 0));
    }

    #[test]
    fn pagination_clamps_out_of_range_values() {
        let page = Pagination {
            limit: Some(5000),
            offset: Some(-3),
        };
        assert_eq!(page.normalize(), (100, 0));

        let page = Pagination {
            limit: Some(0),
            offset: Some(40),
        };
        assert_eq!(page.normalize(), (1, 40));
    }
}
