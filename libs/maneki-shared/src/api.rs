//! Wire types exchanged with the store backend.

use serde::{Deserialize, Serialize};

use crate::status::{IssueType, PaymentGateway};

/// Gateway answer to an on-demand invoice verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub status: String,
    pub invoice_state: Option<String>,
    pub message: Option<String>,
}

impl VerifyPaymentResponse {
    /// The gateway considers the invoice paid. The order's own status
    /// may lag behind this answer.
    pub fn is_confirmed(&self) -> bool {
        self.status == "processed" || self.invoice_state.as_deref() == Some("payed")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopupInvoiceRequest {
    pub amount: f64,
    pub gateway: PaymentGateway,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopupInvoiceResponse {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitWithdrawalRequest {
    pub amount: f64,
    pub method: String,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewActionRequest {
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveTicketRequest {
    pub approve: bool,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTicketRequest {
    pub issue_type: IssueType,
    pub subject: String,
    pub message: String,
    pub order_id: Option<String>,
    pub item_id: Option<String>,
    pub credentials: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogRequest {
    pub action: String,
    pub details: String,
}
