pub mod filter;
pub mod lifecycle;
pub mod poller;
pub mod projection;

pub use filter::{OrderTab, filter_orders};
pub use lifecycle::OrderLifecycleView;
pub use poller::{PaymentVerificationPoller, VerificationOutcome};
pub use projection::{OrderProjection, countdown, format_countdown, project};
