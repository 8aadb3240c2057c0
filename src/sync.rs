use async_trait::async_trait;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::repo::{orders, payments};

/// Cross-entity status propagation, isolated behind a trait so the wiring can
/// change without touching the handlers. The graph is directional and
/// partial: a delivery update mirrors onto its order and may complete the
/// payment; an order update may complete the payment; payment status never
/// propagates anywhere.
#[async_trait]
pub trait StatusSynchronizer: Send + Sync {
    async fn order_status_changed(
        &self,
        pool: &DbPool,
        order_id: Uuid,
        status: &str,
    ) -> AppResult<()>;

    async fn delivery_status_changed(
        &self,
        pool: &DbPool,
        order_id: Uuid,
        status: &str,
    ) -> AppResult<()>;
}

/// Production synchronizer: every edge is attempted on its own and failures
/// are logged and swallowed, so the primary update's outcome is never
/// affected. Callers must not rely on the side updates having happened.
pub struct BestEffortSynchronizer;

#[async_trait]
impl StatusSynchronizer for BestEffortSynchronizer {
    async fn order_status_changed(
        &self,
        pool: &DbPool,
        order_id: Uuid,
        status: &str,
    ) -> AppResult<()> {
        if status == "delivered" || status == "completed" {
            complete_payment(pool, order_id).await;
        }
        Ok(())
    }

    async fn delivery_status_changed(
        &self,
        pool: &DbPool,
        order_id: Uuid,
        status: &str,
    ) -> AppResult<()> {
        // The delivery status string is copied verbatim into the order row,
        // including values outside the order vocabulary.
        match orders::set_status(pool, order_id, status).await {
            Ok(0) => {
                tracing::warn!(%order_id, "order missing while mirroring delivery status");
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, %order_id, "failed to mirror delivery status onto order");
            }
        }

        if status == "delivered" {
            complete_payment(pool, order_id).await;
        }
        Ok(())
    }
}

async fn complete_payment(pool: &DbPool, order_id: Uuid) {
    match payments::find_by_order(pool, order_id).await {
        Ok(Some(payment)) => {
            if let Err(err) = payments::set_status(pool, payment.id, "completed", None).await {
                tracing::warn!(error = %err, %order_id, "failed to mark payment completed");
            }
        }
        Ok(None) => {}
        Err(err) => {
            tracing::warn!(error = %err, %order_id, "failed to look up payment for order");
        }
    }
}
