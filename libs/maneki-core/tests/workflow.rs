use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::{Mutex, Notify};

use maneki_core::api::SettlementApi;
use maneki_core::error::{SettlementError, ValidationError};
use maneki_core::orders::{OrderLifecycleView, OrderTab, VerificationOutcome};
use maneki_core::withdraw::WithdrawalRequestEngine;
use maneki_core::admin::{TicketQueue, WithdrawalQueue};
use maneki_shared::api::{Balance, SubmitTicketRequest, VerifyPaymentResponse};
use maneki_shared::{
    IssueType, Order, OrderItem, OrderStatus, PaymentGateway, SupportTicket, TicketStatus,
    WithdrawalAction, WithdrawalPreview, WithdrawalRequest, WithdrawalStatus,
};

const USDT_FEE: f64 = 1.5;

struct MockApi {
    orders: Mutex<Vec<Order>>,
    withdrawals: Mutex<Vec<WithdrawalRequest>>,
    tickets: Mutex<Vec<SupportTicket>>,
    balance: Mutex<Balance>,

    verify_response: Mutex<Result<VerifyPaymentResponse, String>>,
    /// When set, the first verify/preview call parks until released.
    verify_gate: Notify,
    gate_verify: AtomicBool,
    preview_gate: Notify,
    gate_first_preview: AtomicBool,
    /// Admin transitions fail with this message when set (stale state).
    transition_error: Mutex<Option<String>>,

    get_orders_calls: AtomicUsize,
    verify_calls: AtomicUsize,
    preview_calls: AtomicUsize,
    approve_calls: AtomicUsize,
}

impl MockApi {
    fn new() -> Self {
        Self {
            orders: Mutex::new(Vec::new()),
            withdrawals: Mutex::new(Vec::new()),
            tickets: Mutex::new(Vec::new()),
            balance: Mutex::new(Balance {
                amount: 100.0,
                currency: "USD".to_string(),
            }),
            verify_response: Mutex::new(Ok(confirmed_response())),
            verify_gate: Notify::new(),
            gate_verify: AtomicBool::new(false),
            preview_gate: Notify::new(),
            gate_first_preview: AtomicBool::new(false),
            transition_error: Mutex::new(None),
            get_orders_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
            preview_calls: AtomicUsize::new(0),
            approve_calls: AtomicUsize::new(0),
        }
    }
}

fn confirmed_response() -> VerifyPaymentResponse {
    VerifyPaymentResponse {
        status: "processed".to_string(),
        invoice_state: Some("payed".to_string()),
        message: Some("Invoice paid".to_string()),
    }
}

#[async_trait]
impl SettlementApi for MockApi {
    async fn get_orders(&self) -> Result<Vec<Order>> {
        self.get_orders_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.orders.lock().await.clone())
    }

    async fn verify_order_payment(&self, _order_id: &str) -> Result<VerifyPaymentResponse> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if self.gate_verify.load(Ordering::SeqCst) {
            self.verify_gate.notified().await;
        }
        self.verify_response
            .lock()
            .await
            .clone()
            .map_err(|e| anyhow::anyhow!(e))
    }

    async fn get_balance(&self) -> Result<Balance> {
        Ok(self.balance.lock().await.clone())
    }

    async fn create_topup_invoice(&self, amount: f64, _gateway: PaymentGateway) -> Result<String> {
        Ok(format!("https://pay.example/invoice/{}", amount))
    }

    async fn preview_withdrawal(&self, amount: f64) -> Result<WithdrawalPreview> {
        let call = self.preview_calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 && self.gate_first_preview.load(Ordering::SeqCst) {
            self.preview_gate.notified().await;
        }
        let amount_net = amount - USDT_FEE;
        Ok(WithdrawalPreview {
            amount_requested: amount,
            amount_gross: amount,
            network_fee: USDT_FEE,
            amount_net,
            can_withdraw: amount >= 10.0 && amount_net >= 8.5,
        })
    }

    async fn submit_withdrawal(&self, amount: f64, _method: &str, _details: &str) -> Result<()> {
        self.balance.lock().await.amount -= amount;
        Ok(())
    }

    async fn get_withdrawals(&self) -> Result<Vec<WithdrawalRequest>> {
        Ok(self.withdrawals.lock().await.clone())
    }

    async fn approve_withdrawal(&self, id: &str, comment: Option<&str>) -> Result<()> {
        self.approve_calls.fetch_add(1, Ordering::SeqCst);
        self.transition(id, WithdrawalAction::Approve, comment).await
    }

    async fn reject_withdrawal(&self, id: &str, comment: Option<&str>) -> Result<()> {
        self.transition(id, WithdrawalAction::Reject, comment).await
    }

    async fn complete_withdrawal(&self, id: &str, comment: Option<&str>) -> Result<()> {
        self.transition(id, WithdrawalAction::Complete, comment).await
    }

    async fn get_tickets(&self) -> Result<Vec<SupportTicket>> {
        Ok(self.tickets.lock().await.clone())
    }

    async fn submit_ticket(&self, req: &SubmitTicketRequest) -> Result<SupportTicket> {
        let ticket = SupportTicket {
            id: "tick-new".to_string(),
            status: TicketStatus::Open,
            issue_type: req.issue_type,
            subject: req.subject.clone(),
            message: req.message.clone(),
            credentials: req.credentials.clone(),
            order_id: req.order_id.clone(),
            item_id: req.item_id.clone(),
            admin_comment: None,
            created_at: Utc::now(),
        };
        self.tickets.lock().await.push(ticket.clone());
        Ok(ticket)
    }

    async fn resolve_ticket(&self, id: &str, approve: bool, comment: Option<&str>) -> Result<()> {
        if let Some(msg) = self.transition_error.lock().await.clone() {
            return Err(anyhow::anyhow!(msg));
        }
        let mut tickets = self.tickets.lock().await;
        let ticket = tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| anyhow::anyhow!("ticket not found"))?;
        ticket.status = if approve {
            TicketStatus::Approved
        } else {
            TicketStatus::Rejected
        };
        ticket.admin_comment = comment.map(str::to_string);
        Ok(())
    }

    async fn log_activity(&self, _action: &str, _details: &str) -> Result<()> {
        Ok(())
    }
}

impl MockApi {
    async fn transition(
        &self,
        id: &str,
        action: WithdrawalAction,
        comment: Option<&str>,
    ) -> Result<()> {
        if let Some(msg) = self.transition_error.lock().await.clone() {
            return Err(anyhow::anyhow!(msg));
        }
        let mut withdrawals = self.withdrawals.lock().await;
        let item = withdrawals
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| anyhow::anyhow!("withdrawal not found"))?;
        let next = item
            .status
            .next(action)
            .ok_or_else(|| anyhow::anyhow!("illegal transition"))?;
        item.status = next;
        item.admin_comment = comment.map(str::to_string);
        if next.is_terminal() {
            item.processed_at = Some(Utc::now());
        }
        Ok(())
    }
}

fn pending_order(id: &str) -> Order {
    Order {
        id: id.to_string(),
        raw_status: OrderStatus::Pending,
        total: 19.99,
        currency: "USD".to_string(),
        payment_gateway: Some(PaymentGateway::CryptoBot),
        payment_id: Some(format!("inv-{}", id)),
        payment_url: Some(format!("https://t.me/pay/{}", id)),
        deadline: Some(Utc::now() + chrono::Duration::minutes(30)),
        items: vec![],
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}

fn pending_withdrawal(id: &str) -> WithdrawalRequest {
    WithdrawalRequest {
        id: id.to_string(),
        amount: 50.0,
        balance_currency: "USD".to_string(),
        amount_to_pay: 48.5,
        status: WithdrawalStatus::Pending,
        payment_details: "TAddrExample".to_string(),
        admin_comment: None,
        processed_at: None,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}

fn open_ticket(id: &str) -> SupportTicket {
    SupportTicket {
        id: id.to_string(),
        status: TicketStatus::Open,
        issue_type: IssueType::TechnicalIssue,
        subject: "Login stopped working".to_string(),
        message: "The account logs me out immediately.".to_string(),
        credentials: Some("user:pass".to_string()),
        order_id: None,
        item_id: None,
        admin_comment: None,
        created_at: Utc::now(),
    }
}

async fn wait_for<F: Fn() -> bool>(cond: F) {
    for _ in 0..500 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}

// --- order lifecycle ---

#[tokio::test]
async fn confirmed_payment_reloads_snapshot_once() {
    let api = Arc::new(MockApi::new());
    api.orders.lock().await.push(pending_order("ord-1"));

    let view = OrderLifecycleView::new(api.clone()).with_settle_delay(Duration::ZERO);
    view.reload().await.unwrap();
    let loads_before = api.get_orders_calls.load(Ordering::SeqCst);

    // Server-side status flips while the gateway confirms.
    api.orders.lock().await[0].raw_status = OrderStatus::Paid;

    let outcome = view.check_payment("ord-1").await.unwrap();
    assert!(matches!(outcome, VerificationOutcome::Confirmed { .. }));
    assert_eq!(api.get_orders_calls.load(Ordering::SeqCst), loads_before + 1);
    assert_eq!(
        view.order("ord-1").await.unwrap().raw_status,
        OrderStatus::Paid
    );
}

#[tokio::test]
async fn unconfirmed_payment_leaves_state_untouched() {
    let api = Arc::new(MockApi::new());
    api.orders.lock().await.push(pending_order("ord-1"));
    *api.verify_response.lock().await = Ok(VerifyPaymentResponse {
        status: "waiting".to_string(),
        invoice_state: Some("active".to_string()),
        message: Some("Invoice not paid yet".to_string()),
    });

    let view = OrderLifecycleView::new(api.clone()).with_settle_delay(Duration::ZERO);
    view.reload().await.unwrap();
    let loads_before = api.get_orders_calls.load(Ordering::SeqCst);

    let outcome = view.check_payment("ord-1").await.unwrap();
    match outcome {
        VerificationOutcome::Unconfirmed { state, message } => {
            assert_eq!(state, "active");
            assert_eq!(message.as_deref(), Some("Invoice not paid yet"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    // No reload on an unpaid invoice.
    assert_eq!(api.get_orders_calls.load(Ordering::SeqCst), loads_before);
    assert_eq!(
        view.order("ord-1").await.unwrap().raw_status,
        OrderStatus::Pending
    );
}

#[tokio::test]
async fn transport_failure_surfaces_and_allows_retry() {
    let api = Arc::new(MockApi::new());
    api.orders.lock().await.push(pending_order("ord-1"));
    *api.verify_response.lock().await = Err("connection reset".to_string());

    let view = OrderLifecycleView::new(api.clone()).with_settle_delay(Duration::ZERO);
    view.reload().await.unwrap();

    let err = view.check_payment("ord-1").await.unwrap_err();
    assert!(matches!(err, SettlementError::Verification(_)));
    assert!(!view.is_checking("ord-1").await);

    // The action is immediately available again.
    *api.verify_response.lock().await = Ok(confirmed_response());
    assert!(view.check_payment("ord-1").await.is_ok());
}

#[tokio::test]
async fn concurrent_checks_for_one_order_are_rejected() {
    let api = Arc::new(MockApi::new());
    api.orders.lock().await.push(pending_order("ord-1"));
    api.gate_verify.store(true, Ordering::SeqCst);

    let view = OrderLifecycleView::new(api.clone()).with_settle_delay(Duration::ZERO);
    view.reload().await.unwrap();

    let first = tokio::spawn({
        let view = view.clone();
        async move { view.check_payment("ord-1").await }
    });
    wait_for(|| api.verify_calls.load(Ordering::SeqCst) == 1).await;

    // Second and third triggers while the first is outstanding.
    assert!(matches!(
        view.check_payment("ord-1").await,
        Err(SettlementError::Busy)
    ));
    assert!(view.is_checking("ord-1").await);
    assert!(matches!(
        view.check_payment("ord-1").await,
        Err(SettlementError::Busy)
    ));

    api.verify_gate.notify_one();
    let outcome = first.await.unwrap().unwrap();
    assert!(matches!(outcome, VerificationOutcome::Confirmed { .. }));
    assert_eq!(api.verify_calls.load(Ordering::SeqCst), 1);

    // Sequential re-check afterwards is fine.
    api.gate_verify.store(false, Ordering::SeqCst);
    assert!(view.check_payment("ord-1").await.is_ok());
}

#[tokio::test]
async fn verification_unavailable_for_webhook_only_gateways() {
    let api = Arc::new(MockApi::new());
    let mut order = pending_order("ord-1");
    order.payment_gateway = Some(PaymentGateway::Stripe);
    api.orders.lock().await.push(order);

    let view = OrderLifecycleView::new(api.clone()).with_settle_delay(Duration::ZERO);
    view.reload().await.unwrap();

    assert!(matches!(
        view.check_payment("ord-1").await,
        Err(SettlementError::VerificationUnavailable)
    ));
    assert_eq!(api.verify_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn expired_pending_order_hidden_from_tabs_but_projectable() {
    let api = Arc::new(MockApi::new());
    let mut order = pending_order("ord-1");
    order.deadline = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    api.orders.lock().await.push(order);

    let view = OrderLifecycleView::new(api.clone());
    view.reload().await.unwrap();

    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    assert!(view.visible(OrderTab::All, now).await.is_empty());
    assert!(view.visible(OrderTab::Active, now).await.is_empty());

    // The detail projection still explains the order.
    let p = view.projection("ord-1", now).await.unwrap();
    assert!(p.is_expired);
    assert!(!p.can_pay);
}

#[tokio::test]
async fn refund_ticket_requires_item_eligibility() {
    let api = Arc::new(MockApi::new());
    let mut order = pending_order("ord-1");
    order.raw_status = OrderStatus::Delivered;
    order.items = vec![
        OrderItem {
            id: "item-1".to_string(),
            name: "Plus subscription".to_string(),
            can_request_refund: false,
            warranty_until: None,
        },
        OrderItem {
            id: "item-2".to_string(),
            name: "Pro subscription".to_string(),
            can_request_refund: true,
            warranty_until: Some(Utc::now() + chrono::Duration::days(10)),
        },
    ];
    api.orders.lock().await.push(order);

    let view = OrderLifecycleView::new(api.clone());
    view.reload().await.unwrap();

    let err = view
        .request_refund_ticket("ord-1", "item-1", "does not work")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SettlementError::Validation(ValidationError::RefundNotAvailable)
    ));

    let ticket = view
        .request_refund_ticket("ord-1", "item-2", "does not work")
        .await
        .unwrap();
    assert_eq!(ticket.issue_type, IssueType::Refund);
    assert_eq!(ticket.order_id.as_deref(), Some("ord-1"));
    assert_eq!(ticket.item_id.as_deref(), Some("item-2"));
}

// --- withdrawal engine ---

#[tokio::test]
async fn preview_then_submit_refetches_balance() {
    let api = Arc::new(MockApi::new());
    let engine = WithdrawalRequestEngine::new(api.clone(), 10.0);
    engine.refresh_balance().await.unwrap();

    let preview = engine.request_preview(50.0).await.unwrap();
    assert_eq!(preview.amount_net, 48.5);
    assert!(preview.can_withdraw);

    engine.validate(50.0, "TAddrExample").await.unwrap();
    engine.submit(50.0, "usdt_trc20", "TAddrExample").await.unwrap();

    // Server truth, not local subtraction on the cached figure.
    assert_eq!(engine.balance().await.unwrap().amount, 50.0);
    // The consumed preview cannot back a second submission.
    assert!(matches!(
        engine.submit(50.0, "usdt_trc20", "TAddrExample").await,
        Err(SettlementError::PreviewPending)
    ));
}

#[tokio::test]
async fn below_floor_preview_blocks_submission() {
    let api = Arc::new(MockApi::new());
    let engine = WithdrawalRequestEngine::new(api.clone(), 5.0);
    engine.refresh_balance().await.unwrap();

    let preview = engine.request_preview(9.0).await.unwrap();
    assert_eq!(preview.amount_net, 7.5);
    assert!(!preview.can_withdraw);

    assert!(matches!(
        engine.validate(9.0, "TAddrExample").await,
        Err(ValidationError::BelowFeeFloor { .. })
    ));
    assert!(matches!(
        engine.submit(9.0, "usdt_trc20", "TAddrExample").await,
        Err(SettlementError::Validation(ValidationError::BelowFeeFloor { .. }))
    ));
}

#[tokio::test]
async fn stale_preview_is_discarded() {
    let api = Arc::new(MockApi::new());
    api.gate_first_preview.store(true, Ordering::SeqCst);
    let engine = WithdrawalRequestEngine::new(api.clone(), 10.0);
    engine.refresh_balance().await.unwrap();

    // First preview parks in flight while the user edits the amount.
    let stale = tokio::spawn({
        let engine = engine.clone();
        async move { engine.request_preview(50.0).await }
    });
    wait_for(|| api.preview_calls.load(Ordering::SeqCst) == 1).await;

    let fresh = engine.request_preview(60.0).await.unwrap();
    assert_eq!(fresh.amount_requested, 60.0);

    api.preview_gate.notify_one();
    stale.await.unwrap().unwrap();

    // The late 50.0 result must not shadow the current 60.0 preview.
    assert_eq!(
        engine.current_preview().await.unwrap().amount_requested,
        60.0
    );
    assert!(matches!(
        engine.submit(50.0, "usdt_trc20", "TAddrExample").await,
        Err(SettlementError::PreviewPending)
    ));
    engine.submit(60.0, "usdt_trc20", "TAddrExample").await.unwrap();
}

#[tokio::test]
async fn submit_without_preview_is_blocked() {
    let api = Arc::new(MockApi::new());
    let engine = WithdrawalRequestEngine::new(api.clone(), 10.0);
    engine.refresh_balance().await.unwrap();

    assert!(matches!(
        engine.submit(50.0, "usdt_trc20", "TAddrExample").await,
        Err(SettlementError::PreviewPending)
    ));
}

// --- admin queues ---

#[tokio::test]
async fn withdrawal_walks_pending_processing_completed() {
    let api = Arc::new(MockApi::new());
    api.withdrawals.lock().await.push(pending_withdrawal("wd-1"));

    let queue = WithdrawalQueue::new(api.clone());
    queue.refresh().await.unwrap();
    queue.select(Some("wd-1")).await;
    assert_eq!(queue.pending_count().await, 1);
    assert_eq!(
        queue.allowed_actions("wd-1").await,
        &[WithdrawalAction::Approve, WithdrawalAction::Reject]
    );

    queue.apply("wd-1", WithdrawalAction::Approve).await.unwrap();
    let selected = queue.selected().await.unwrap();
    assert_eq!(selected.status, WithdrawalStatus::Processing);
    assert_eq!(queue.allowed_actions("wd-1").await, &[WithdrawalAction::Complete]);
    assert_eq!(queue.pending_count().await, 0);

    queue.set_comment("tx 0xabc").await;
    queue.apply("wd-1", WithdrawalAction::Complete).await.unwrap();
    let selected = queue.selected().await.unwrap();
    assert_eq!(selected.status, WithdrawalStatus::Completed);
    assert_eq!(selected.admin_comment.as_deref(), Some("tx 0xabc"));
    assert!(selected.processed_at.is_some());
    // Draft cleared after the confirmed action.
    assert_eq!(queue.comment().await, "");
}

#[tokio::test]
async fn illegal_actions_never_reach_the_server() {
    let api = Arc::new(MockApi::new());
    api.withdrawals.lock().await.push(pending_withdrawal("wd-1"));

    let queue = WithdrawalQueue::new(api.clone());
    queue.refresh().await.unwrap();

    // Completing straight from PENDING is not a thing.
    let err = queue.apply("wd-1", WithdrawalAction::Complete).await.unwrap_err();
    assert!(matches!(err, SettlementError::TransitionRejected(_)));
    assert_eq!(api.approve_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        queue.items().await[0].status,
        WithdrawalStatus::Pending
    );
}

#[tokio::test]
async fn server_refusal_resyncs_and_keeps_comment() {
    let api = Arc::new(MockApi::new());
    // The operator's list is stale: the request already completed.
    let mut stale = pending_withdrawal("wd-1");
    stale.status = WithdrawalStatus::Pending;
    api.withdrawals.lock().await.push(stale);

    let queue = WithdrawalQueue::new(api.clone());
    queue.refresh().await.unwrap();
    queue.select(Some("wd-1")).await;
    queue.set_comment("ok to pay").await;

    {
        // Another operator finished it meanwhile.
        let mut withdrawals = api.withdrawals.lock().await;
        withdrawals[0].status = WithdrawalStatus::Completed;
        *api.transition_error.lock().await = Some("already completed".to_string());
    }

    let err = queue.apply("wd-1", WithdrawalAction::Approve).await.unwrap_err();
    assert!(matches!(err, SettlementError::TransitionRejected(_)));

    // Refreshed to server truth, no local regression, comment intact.
    let selected = queue.selected().await.unwrap();
    assert_eq!(selected.status, WithdrawalStatus::Completed);
    assert_eq!(queue.comment().await, "ok to pay");
    assert!(!queue.is_busy("wd-1").await);
}

#[tokio::test]
async fn ticket_reject_with_comment_persists() {
    let api = Arc::new(MockApi::new());
    api.tickets.lock().await.push(open_ticket("tick-1"));

    let queue = TicketQueue::new(api.clone());
    queue.refresh().await.unwrap();
    queue.select(Some("tick-1")).await;
    assert_eq!(queue.pending_count().await, 1);
    assert!(queue.can_resolve("tick-1").await);

    queue.set_comment("No defect reproducible on our side").await;
    queue.resolve("tick-1", false).await.unwrap();

    let selected = queue.selected().await.unwrap();
    assert_eq!(selected.status, TicketStatus::Rejected);
    assert_eq!(
        selected.admin_comment.as_deref(),
        Some("No defect reproducible on our side")
    );
    assert_eq!(queue.pending_count().await, 0);
    assert!(!queue.can_resolve("tick-1").await);

    // A second resolve is rejected locally.
    let err = queue.resolve("tick-1", true).await.unwrap_err();
    assert!(matches!(err, SettlementError::TransitionRejected(_)));
}

#[tokio::test]
async fn selecting_another_ticket_drops_the_draft() {
    let api = Arc::new(MockApi::new());
    api.tickets.lock().await.push(open_ticket("tick-1"));
    api.tickets.lock().await.push(open_ticket("tick-2"));

    let queue = TicketQueue::new(api.clone());
    queue.refresh().await.unwrap();
    queue.select(Some("tick-1")).await;
    queue.set_comment("half-written answer").await;
    queue.select(Some("tick-2")).await;
    assert_eq!(queue.comment().await, "");
}
