use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{PaymentWithCustomer, PaymentWithOrder};

/// Multipart fields collected by the payment-create handler before
/// validation; everything arrives as text parts plus at most one file part.
#[derive(Debug, Default)]
pub struct PaymentForm {
    pub order_id: Option<String>,
    pub payment_method: Option<String>,
    pub amount: Option<String>,
    pub screenshot: Option<ScreenshotUpload>,
}

#[derive(Debug)]
pub struct ScreenshotUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Schema mirror of [`PaymentForm`] for the OpenAPI document.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct PaymentCreateForm {
    pub order_id: String,
    pub payment_method: String,
    pub amount: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub payment_screenshot: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePaymentStatusRequest {
    pub status: Option<String>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentCreated {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentList {
    pub payments: Vec<PaymentWithCustomer>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserPaymentList {
    pub payments: Vec<PaymentWithOrder>,
    pub limit: i64,
    pub offset: i64,
}
