pub mod queue;
pub mod tickets;
pub mod withdrawals;

pub use queue::{ReviewItem, ReviewQueueState};
pub use tickets::TicketQueue;
pub use withdrawals::WithdrawalQueue;
