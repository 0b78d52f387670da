use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use maneki_shared::Order;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::api::SettlementApi;
use crate::error::SettlementError;

/// How long to wait after the gateway confirms payment before the order
/// snapshot is reloaded. The verification endpoint confirming payment
/// does not guarantee the order's own status has been updated yet, so
/// one fixed wait is taken before the single reload.
const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    /// The gateway reports the invoice as paid. The settle delay has
    /// already elapsed when this is returned; the caller reloads the
    /// order snapshot exactly once.
    Confirmed { message: String },
    /// Any other resolved gateway state, surfaced literally. Local
    /// order state is left untouched.
    Unconfirmed {
        state: String,
        message: Option<String>,
    },
}

/// On-demand invoice verification. Triggered by the user in the current
/// design; the interface takes an order and returns an outcome, so a
/// timer-driven variant is a drop-in swap with a different trigger.
#[derive(Clone)]
pub struct PaymentVerificationPoller {
    api: Arc<dyn SettlementApi>,
    in_flight: Arc<Mutex<HashSet<String>>>,
    settle_delay: Duration,
}

impl PaymentVerificationPoller {
    pub fn new(api: Arc<dyn SettlementApi>) -> Self {
        Self {
            api,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub async fn is_checking(&self, order_id: &str) -> bool {
        self.in_flight.lock().await.contains(order_id)
    }

    /// Verify one order's invoice against its gateway. At most one
    /// verification per order is in flight at a time; a second call for
    /// the same order while one is outstanding returns `Busy` without
    /// touching the gateway.
    pub async fn check(&self, order: &Order) -> Result<VerificationOutcome, SettlementError> {
        let checkable = order.payment_id.is_some()
            && order
                .payment_gateway
                .is_some_and(|g| g.supports_verification());
        if !checkable {
            return Err(SettlementError::VerificationUnavailable);
        }

        {
            let mut in_flight = self.in_flight.lock().await;
            if !in_flight.insert(order.id.clone()) {
                return Err(SettlementError::Busy);
            }
        }

        let result = self.run(order).await;
        self.in_flight.lock().await.remove(&order.id);
        result
    }

    async fn run(&self, order: &Order) -> Result<VerificationOutcome, SettlementError> {
        let resp = match self.api.verify_order_payment(&order.id).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Payment verification for order {} failed: {:#}", order.id, e);
                return Err(SettlementError::Verification(e));
            }
        };

        if resp.is_confirmed() {
            info!("Order {} payment confirmed by gateway", order.id);
            tokio::time::sleep(self.settle_delay).await;
            return Ok(VerificationOutcome::Confirmed {
                message: resp
                    .message
                    .unwrap_or_else(|| "Payment confirmed".to_string()),
            });
        }

        Ok(VerificationOutcome::Unconfirmed {
            state: resp.invoice_state.unwrap_or(resp.status),
            message: resp.message,
        })
    }
}
