use chrono::{DateTime, Duration, Utc};
use maneki_shared::{Order, OrderStatus};

/// UI-facing view of one order, derived from the server-owned status,
/// the payment deadline and a single injected `now`. Pure: calling it
/// twice with the same inputs yields identical output.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderProjection {
    pub display_status: OrderStatus,
    pub status_message: &'static str,
    pub is_expired: bool,
    pub can_pay: bool,
    pub can_check_payment: bool,
}

pub fn project(order: &Order, now: DateTime<Utc>) -> OrderProjection {
    let is_expired = order.deadline.is_some_and(|d| d < now);

    // A pending order past its deadline is shown as expired even while
    // the server still reports `pending`. It stays visible in a detail
    // view so the user understands why payment failed, but every
    // payment action is suppressed until the server catches up.
    let display_status = if order.raw_status == OrderStatus::Pending && is_expired {
        OrderStatus::Expired
    } else {
        order.raw_status
    };

    let can_pay = order.raw_status == OrderStatus::Pending
        && order.payment_url.is_some()
        && !is_expired;

    let can_check_payment = order.payment_id.is_some()
        && order
            .payment_gateway
            .is_some_and(|g| g.supports_verification());

    OrderProjection {
        display_status,
        status_message: status_message(display_status),
        is_expired,
        can_pay,
        can_check_payment,
    }
}

fn status_message(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Awaiting payment",
        // Payment confirmed, fulfillment pending (stock unavailable).
        // Distinct from Pending so an already-paid order never shows
        // the payment-required banner again.
        OrderStatus::Prepaid => "Payment received, your order is queued for delivery",
        OrderStatus::Paid => "Paid, preparing delivery",
        OrderStatus::Partial => "Partially delivered",
        OrderStatus::Delivered => "Delivered",
        OrderStatus::Cancelled => "Cancelled",
        OrderStatus::Refunded => "Refunded",
        OrderStatus::Expired => "Payment window expired",
        OrderStatus::Failed => "Payment failed",
    }
}

/// Time remaining until the payment deadline, clamped at zero. `None`
/// when the order has no deadline or is past awaiting payment.
pub fn countdown(order: &Order, now: DateTime<Utc>) -> Option<Duration> {
    if !order.raw_status.is_awaiting_payment() {
        return None;
    }
    let deadline = order.deadline?;
    Some((deadline - now).max(Duration::zero()))
}

/// "MM:SS" rendering of a countdown value.
pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.num_seconds().max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
