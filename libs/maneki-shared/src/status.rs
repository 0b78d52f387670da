use serde::{Deserialize, Serialize};

/// Server-owned order status. The client never sets this locally, it
/// only derives presentational state from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Prepaid,
    Paid,
    Partial,
    Delivered,
    Cancelled,
    Refunded,
    Expired,
    Failed,
}

impl OrderStatus {
    /// Statuses with no further user action possible.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered
                | OrderStatus::Cancelled
                | OrderStatus::Refunded
                | OrderStatus::Expired
                | OrderStatus::Failed
        )
    }

    pub fn is_awaiting_payment(self) -> bool {
        matches!(self, OrderStatus::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentGateway {
    CryptoBot,
    NowPayments,
    CrystalPay,
    Stripe,
}

impl PaymentGateway {
    /// Only CryptoBot exposes an invoice verification endpoint; the
    /// other gateways confirm exclusively through webhooks, so there is
    /// nothing the client can ask them.
    pub fn supports_verification(self) -> bool {
        matches!(self, PaymentGateway::CryptoBot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalStatus {
    Pending,
    Processing,
    Completed,
    Rejected,
}

/// Operator actions on a withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalAction {
    Approve,
    Reject,
    Complete,
}

impl WithdrawalStatus {
    /// The status an action moves this request into, or `None` when the
    /// action is not legal from the current status. Once approved, a
    /// request can only complete; there is no reject path out of
    /// `Processing`.
    pub fn next(self, action: WithdrawalAction) -> Option<WithdrawalStatus> {
        match (self, action) {
            (WithdrawalStatus::Pending, WithdrawalAction::Approve) => {
                Some(WithdrawalStatus::Processing)
            }
            (WithdrawalStatus::Pending, WithdrawalAction::Reject) => {
                Some(WithdrawalStatus::Rejected)
            }
            (WithdrawalStatus::Processing, WithdrawalAction::Complete) => {
                Some(WithdrawalStatus::Completed)
            }
            _ => None,
        }
    }

    pub fn allowed_actions(self) -> &'static [WithdrawalAction] {
        match self {
            WithdrawalStatus::Pending => &[WithdrawalAction::Approve, WithdrawalAction::Reject],
            WithdrawalStatus::Processing => &[WithdrawalAction::Complete],
            WithdrawalStatus::Completed | WithdrawalStatus::Rejected => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, WithdrawalStatus::Completed | WithdrawalStatus::Rejected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Open,
    Approved,
    Rejected,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketAction {
    Resolve { approve: bool },
}

impl TicketStatus {
    pub fn next(self, action: TicketAction) -> Option<TicketStatus> {
        match (self, action) {
            (TicketStatus::Open, TicketAction::Resolve { approve: true }) => {
                Some(TicketStatus::Approved)
            }
            (TicketStatus::Open, TicketAction::Resolve { approve: false }) => {
                Some(TicketStatus::Rejected)
            }
            _ => None,
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, TicketStatus::Open)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Replacement,
    Refund,
    TechnicalIssue,
    General,
}
