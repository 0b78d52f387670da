use anyhow::Result;
use maneki_shared::api::{Balance, TopupInvoiceResponse, VerifyPaymentResponse};
use maneki_shared::{Order, PaymentGateway};

use crate::api_client::ApiClient;

#[derive(Clone)]
pub struct OrderService {
    api: ApiClient,
}

impl OrderService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_orders(&self) -> Result<Vec<Order>> {
        self.api.get::<Vec<Order>>("/orders").await
    }

    pub async fn verify_payment(&self, order_id: &str) -> Result<VerifyPaymentResponse> {
        self.api
            .post::<VerifyPaymentResponse, _>(&format!("/orders/{}/verify-payment", order_id), &())
            .await
    }

    pub async fn get_balance(&self) -> Result<Balance> {
        self.api.get::<Balance>("/balance").await
    }

    pub async fn create_topup_invoice(
        &self,
        amount: f64,
        gateway: PaymentGateway,
    ) -> Result<String> {
        #[derive(serde::Serialize)]
        struct InvoiceReq {
            amount: f64,
            gateway: PaymentGateway,
        }
        let resp: TopupInvoiceResponse = self
            .api
            .post("/payments/topup", &InvoiceReq { amount, gateway })
            .await?;
        Ok(resp.url)
    }
}
