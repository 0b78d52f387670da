use std::sync::Arc;

use anyhow::Result;
use maneki_shared::PaymentGateway;

use crate::admin::{TicketQueue, WithdrawalQueue};
use crate::api::{HttpSettlementApi, SettlementApi};
use crate::config::Config;
use crate::orders::OrderLifecycleView;
use crate::withdraw::WithdrawalRequestEngine;

/// Default minimum withdrawal amount in the balance currency, used
/// until the server supplies its own limits.
const DEFAULT_MIN_WITHDRAWAL: f64 = 10.0;

/// Everything the presentation layer holds on to.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn SettlementApi>,
    pub orders: OrderLifecycleView,
    pub withdraw: WithdrawalRequestEngine,
    pub withdrawal_queue: WithdrawalQueue,
    pub ticket_queue: TicketQueue,
}

impl AppState {
    pub fn new(api: Arc<dyn SettlementApi>) -> Self {
        Self {
            orders: OrderLifecycleView::new(api.clone()),
            withdraw: WithdrawalRequestEngine::new(api.clone(), DEFAULT_MIN_WITHDRAWAL),
            withdrawal_queue: WithdrawalQueue::new(api.clone()),
            ticket_queue: TicketQueue::new(api.clone()),
            api,
        }
    }

    pub fn from_env() -> Result<Self> {
        let config = Config::from_env()?;
        let api = HttpSettlementApi::new(&config)?;
        Ok(Self::new(Arc::new(api)))
    }

    /// Open a top-up invoice with the chosen gateway. The balance is
    /// refetched by the caller once the user returns from payment; it
    /// is never bumped locally.
    pub async fn create_topup_invoice(
        &self,
        amount: f64,
        gateway: PaymentGateway,
    ) -> Result<String> {
        self.api.create_topup_invoice(amount, gateway).await
    }
}
