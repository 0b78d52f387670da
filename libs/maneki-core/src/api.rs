use anyhow::Result;
use async_trait::async_trait;
use maneki_shared::api::{Balance, SubmitTicketRequest, VerifyPaymentResponse};
use maneki_shared::{
    Order, PaymentGateway, SupportTicket, WithdrawalPreview, WithdrawalRequest,
};

use crate::api_client::ApiClient;
use crate::config::Config;
use crate::services::{ActivityService, OrderService, TicketService, WithdrawalService};

/// Everything the settlement core asks of the store backend. Reads are
/// full current snapshots; there is no incremental protocol.
#[async_trait]
pub trait SettlementApi: Send + Sync {
    async fn get_orders(&self) -> Result<Vec<Order>>;
    async fn verify_order_payment(&self, order_id: &str) -> Result<VerifyPaymentResponse>;
    async fn get_balance(&self) -> Result<Balance>;
    async fn create_topup_invoice(&self, amount: f64, gateway: PaymentGateway) -> Result<String>;

    async fn preview_withdrawal(&self, amount: f64) -> Result<WithdrawalPreview>;
    async fn submit_withdrawal(&self, amount: f64, method: &str, details: &str) -> Result<()>;
    async fn get_withdrawals(&self) -> Result<Vec<WithdrawalRequest>>;
    async fn approve_withdrawal(&self, id: &str, comment: Option<&str>) -> Result<()>;
    async fn reject_withdrawal(&self, id: &str, comment: Option<&str>) -> Result<()>;
    async fn complete_withdrawal(&self, id: &str, comment: Option<&str>) -> Result<()>;

    async fn get_tickets(&self) -> Result<Vec<SupportTicket>>;
    async fn submit_ticket(&self, req: &SubmitTicketRequest) -> Result<SupportTicket>;
    async fn resolve_ticket(&self, id: &str, approve: bool, comment: Option<&str>) -> Result<()>;

    async fn log_activity(&self, action: &str, details: &str) -> Result<()>;
}

/// REST-backed implementation over the store's app API.
pub struct HttpSettlementApi {
    orders: OrderService,
    withdrawals: WithdrawalService,
    tickets: TicketService,
    activity: ActivityService,
}

impl HttpSettlementApi {
    pub fn new(config: &Config) -> Result<Self> {
        let client = ApiClient::new(config)?;
        Ok(Self {
            orders: OrderService::new(client.clone()),
            withdrawals: WithdrawalService::new(client.clone()),
            tickets: TicketService::new(client.clone()),
            activity: ActivityService::new(client),
        })
    }
}

#[async_trait]
impl SettlementApi for HttpSettlementApi {
    async fn get_orders(&self) -> Result<Vec<Order>> {
        self.orders.get_orders().await
    }

    async fn verify_order_payment(&self, order_id: &str) -> Result<VerifyPaymentResponse> {
        self.orders.verify_payment(order_id).await
    }

    async fn get_balance(&self) -> Result<Balance> {
        self.orders.get_balance().await
    }

    async fn create_topup_invoice(&self, amount: f64, gateway: PaymentGateway) -> Result<String> {
        self.orders.create_topup_invoice(amount, gateway).await
    }

    async fn preview_withdrawal(&self, amount: f64) -> Result<WithdrawalPreview> {
        self.withdrawals.preview(amount).await
    }

    async fn submit_withdrawal(&self, amount: f64, method: &str, details: &str) -> Result<()> {
        self.withdrawals.submit(amount, method, details).await
    }

    async fn get_withdrawals(&self) -> Result<Vec<WithdrawalRequest>> {
        self.withdrawals.get_withdrawals().await
    }

    async fn approve_withdrawal(&self, id: &str, comment: Option<&str>) -> Result<()> {
        self.withdrawals.approve(id, comment).await
    }

    async fn reject_withdrawal(&self, id: &str, comment: Option<&str>) -> Result<()> {
        self.withdrawals.reject(id, comment).await
    }

    async fn complete_withdrawal(&self, id: &str, comment: Option<&str>) -> Result<()> {
        self.withdrawals.complete(id, comment).await
    }

    async fn get_tickets(&self) -> Result<Vec<SupportTicket>> {
        self.tickets.get_tickets().await
    }

    async fn submit_ticket(&self, req: &SubmitTicketRequest) -> Result<SupportTicket> {
        self.tickets.submit(req).await
    }

    async fn resolve_ticket(&self, id: &str, approve: bool, comment: Option<&str>) -> Result<()> {
        self.tickets.resolve(id, approve, comment).await
    }

    async fn log_activity(&self, action: &str, details: &str) -> Result<()> {
        self.activity.log(action, details).await
    }
}
