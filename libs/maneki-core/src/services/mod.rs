pub mod activity_service;
pub mod order_service;
pub mod ticket_service;
pub mod withdrawal_service;

pub use activity_service::ActivityService;
pub use order_service::OrderService;
pub use ticket_service::TicketService;
pub use withdrawal_service::WithdrawalService;
