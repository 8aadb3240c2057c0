use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Delivery, DeliveryWithCustomer, Order};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDeliveryRequest {
    pub order_id: Option<Uuid>,
    /// `YYYY-MM-DD`.
    pub estimated_delivery_date: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDeliveryStatusRequest {
    pub delivery_status: Option<String>,
    /// `YYYY-MM-DD`; persisted when present.
    pub actual_delivery_date: Option<String>,
    /// Accepted for client compatibility and ignored; tracking numbers are
    /// fixed at creation.
    pub tracking_number: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeliveryCreated {
    pub id: Uuid,
    pub tracking_number: String,
}

/// Public tracking lookup: the delivery with its order embedded.
#[derive(Debug, Serialize, ToSchema)]
pub struct TrackingResult {
    #[serde(flatten)]
    pub delivery: Delivery,
    pub order: Option<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeliveryList {
    pub deliveries: Vec<DeliveryWithCustomer>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserDeliveryList {
    pub deliveries: Vec<Delivery>,
    pub limit: i64,
    pub offset: i64,
}
