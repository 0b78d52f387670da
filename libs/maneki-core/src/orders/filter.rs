use chrono::{DateTime, Utc};
use maneki_shared::{Order, OrderStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderTab {
    All,
    Active,
    Log,
}

/// Abandoned/failed checkouts carry no further user action and no
/// informational value in a list, so they are dropped before any tab
/// filtering. The detail view intentionally still shows them.
fn is_suppressed(order: &Order, now: DateTime<Utc>) -> bool {
    match order.raw_status {
        OrderStatus::Cancelled | OrderStatus::Expired => true,
        OrderStatus::Pending => order.deadline.is_some_and(|d| d < now),
        _ => false,
    }
}

/// Pure tab filter over the full order snapshot, newest first. Never
/// mutates or requests server state.
pub fn filter_orders<'a>(
    orders: &'a [Order],
    tab: OrderTab,
    now: DateTime<Utc>,
) -> Vec<&'a Order> {
    let mut visible: Vec<&Order> = orders
        .iter()
        .filter(|o| !is_suppressed(o, now))
        .filter(|o| match tab {
            OrderTab::All => true,
            OrderTab::Active => matches!(
                o.raw_status,
                OrderStatus::Pending
                    | OrderStatus::Paid
                    | OrderStatus::Prepaid
                    | OrderStatus::Partial
            ),
            OrderTab::Log => matches!(
                o.raw_status,
                OrderStatus::Delivered | OrderStatus::Refunded
            ),
        })
        .collect();
    visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    visible
}
