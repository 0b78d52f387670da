pub mod api;
pub mod order;
pub mod status;
pub mod ticket;
pub mod withdrawal;

pub use order::{Order, OrderItem};
pub use status::{
    IssueType, OrderStatus, PaymentGateway, TicketAction, TicketStatus, WithdrawalAction,
    WithdrawalStatus,
};
pub use ticket::SupportTicket;
pub use withdrawal::{WithdrawalPreview, WithdrawalRequest};
