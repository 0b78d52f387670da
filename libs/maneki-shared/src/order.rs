use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::{OrderStatus, PaymentGateway};

/// A purchase record moving through payment and fulfillment states.
/// `raw_status` is authoritative and server-owned; everything the UI
/// shows is derived from it together with `deadline` and the clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub raw_status: OrderStatus,
    pub total: f64,
    pub currency: String,
    /// Present only while the invoice is still payable.
    pub payment_gateway: Option<PaymentGateway>,
    pub payment_id: Option<String>,
    pub payment_url: Option<String>,
    /// Payment must complete before this instant, or the order is
    /// treated as expired even if the server has not caught up yet.
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

/// Items carry their own warranty eligibility, decoupled from the
/// order-level status: an order can be delivered while one item is
/// still within its warranty window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub name: String,
    pub can_request_refund: bool,
    pub warranty_until: Option<DateTime<Utc>>,
}
