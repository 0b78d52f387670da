use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use maneki_shared::api::SubmitTicketRequest;
use maneki_shared::{IssueType, Order, SupportTicket};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api::SettlementApi;
use crate::error::{SettlementError, ValidationError};
use crate::orders::filter::{OrderTab, filter_orders};
use crate::orders::poller::{PaymentVerificationPoller, VerificationOutcome};
use crate::orders::projection::{OrderProjection, project};

/// Customer-facing order state machine: holds the latest order
/// snapshot, projects it against a single `now` per evaluation pass,
/// and drives on-demand payment verification including the
/// post-confirmation reload.
#[derive(Clone)]
pub struct OrderLifecycleView {
    api: Arc<dyn SettlementApi>,
    poller: PaymentVerificationPoller,
    orders: Arc<RwLock<Vec<Order>>>,
}

impl OrderLifecycleView {
    pub fn new(api: Arc<dyn SettlementApi>) -> Self {
        let poller = PaymentVerificationPoller::new(api.clone());
        Self {
            api,
            poller,
            orders: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Shortens the post-confirmation settle wait. Intended for tests
    /// and embedders that already poll elsewhere.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.poller = self.poller.with_settle_delay(delay);
        self
    }

    /// Replace the snapshot with the server's current one.
    pub async fn reload(&self) -> Result<()> {
        let fresh = self.api.get_orders().await?;
        *self.orders.write().await = fresh;
        Ok(())
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }

    pub async fn order(&self, order_id: &str) -> Option<Order> {
        self.orders
            .read()
            .await
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
    }

    /// The filtered tab view over the current snapshot.
    pub async fn visible(&self, tab: OrderTab, now: DateTime<Utc>) -> Vec<Order> {
        let orders = self.orders.read().await;
        filter_orders(&orders, tab, now)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn projection(
        &self,
        order_id: &str,
        now: DateTime<Utc>,
    ) -> Option<OrderProjection> {
        self.order(order_id).await.map(|o| project(&o, now))
    }

    pub async fn is_checking(&self, order_id: &str) -> bool {
        self.poller.is_checking(order_id).await
    }

    /// User-triggered "check payment". On a confirmed invoice the
    /// snapshot is reloaded once, after the poller's settle wait, so
    /// the server-side status has had a chance to propagate.
    pub async fn check_payment(
        &self,
        order_id: &str,
    ) -> Result<VerificationOutcome, SettlementError> {
        let order = self
            .order(order_id)
            .await
            .ok_or(SettlementError::NotFound)?;

        let outcome = self.poller.check(&order).await?;

        if matches!(outcome, VerificationOutcome::Confirmed { .. }) {
            if let Err(e) = self.reload().await {
                warn!("Order reload after confirmed payment failed: {:#}", e);
            }
        }

        Ok(outcome)
    }

    /// File a warranty refund ticket for one delivered item. Guarded by
    /// the item's own refund eligibility, not the order-level status.
    pub async fn request_refund_ticket(
        &self,
        order_id: &str,
        item_id: &str,
        message: &str,
    ) -> Result<SupportTicket, SettlementError> {
        let order = self
            .order(order_id)
            .await
            .ok_or(SettlementError::NotFound)?;
        let item = order
            .items
            .iter()
            .find(|i| i.id == item_id)
            .ok_or(SettlementError::NotFound)?;
        if !item.can_request_refund {
            return Err(ValidationError::RefundNotAvailable.into());
        }

        let ticket = self
            .api
            .submit_ticket(&SubmitTicketRequest {
                issue_type: IssueType::Refund,
                subject: format!("Refund request for {}", item.name),
                message: message.to_string(),
                order_id: Some(order.id.clone()),
                item_id: Some(item.id.clone()),
                credentials: None,
            })
            .await?;

        if let Err(e) = self
            .api
            .log_activity("refund_requested", &format!("order {} item {}", order_id, item_id))
            .await
        {
            debug!("Activity log failed: {:#}", e);
        }

        Ok(ticket)
    }
}
