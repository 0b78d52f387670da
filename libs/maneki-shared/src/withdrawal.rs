use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::WithdrawalStatus;

/// A user-initiated request to move balance out to an external payout
/// destination. Transitions are applied server-side only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub id: String,
    /// Amount in the user's balance currency.
    pub amount: f64,
    pub balance_currency: String,
    /// Net amount in the payout currency (USDT).
    pub amount_to_pay: f64,
    pub status: WithdrawalStatus,
    /// Destination address/account supplied by the user.
    pub payment_details: String,
    /// Set on any operator transition, persisted permanently once set.
    pub admin_comment: Option<String>,
    /// Set on terminal transition.
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Ephemeral fee computation for a proposed withdrawal amount. Never
/// persisted, never cached across amount edits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalPreview {
    pub amount_requested: f64,
    /// Requested amount converted to the payout currency.
    pub amount_gross: f64,
    pub network_fee: f64,
    /// `amount_gross - network_fee`.
    pub amount_net: f64,
    pub can_withdraw: bool,
}
