use std::sync::Arc;

use anyhow::Result;
use maneki_shared::{WithdrawalAction, WithdrawalRequest, WithdrawalStatus};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::admin::queue::{ReviewItem, ReviewQueueState};
use crate::api::SettlementApi;
use crate::error::SettlementError;

impl ReviewItem for WithdrawalRequest {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Operator queue over pending withdrawal requests. Transitions are
/// server-confirmed: a successful action never patches the item
/// locally, it refetches the authoritative list.
#[derive(Clone)]
pub struct WithdrawalQueue {
    api: Arc<dyn SettlementApi>,
    state: Arc<RwLock<ReviewQueueState<WithdrawalRequest>>>,
}

impl WithdrawalQueue {
    pub fn new(api: Arc<dyn SettlementApi>) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(ReviewQueueState::default())),
        }
    }

    pub async fn refresh(&self) -> Result<()> {
        let items = self.api.get_withdrawals().await?;
        self.state.write().await.set_items(items);
        Ok(())
    }

    pub async fn items(&self) -> Vec<WithdrawalRequest> {
        self.state.read().await.items().to_vec()
    }

    pub async fn pending_count(&self) -> usize {
        self.state
            .read()
            .await
            .items()
            .iter()
            .filter(|w| w.status == WithdrawalStatus::Pending)
            .count()
    }

    pub async fn select(&self, id: Option<&str>) {
        self.state.write().await.select(id);
    }

    pub async fn selected(&self) -> Option<WithdrawalRequest> {
        self.state.read().await.selected().cloned()
    }

    pub async fn set_comment(&self, comment: &str) {
        self.state.write().await.set_comment(comment);
    }

    pub async fn comment(&self) -> String {
        self.state.read().await.comment().to_string()
    }

    pub async fn is_busy(&self, id: &str) -> bool {
        self.state.read().await.is_busy(id)
    }

    /// Actions legal for the item right now; drives which buttons the
    /// console renders.
    pub async fn allowed_actions(&self, id: &str) -> &'static [WithdrawalAction] {
        match self.state.read().await.get(id) {
            Some(item) => item.status.allowed_actions(),
            None => &[],
        }
    }

    /// Apply one operator action. The comment draft rides along; on
    /// success it is cleared and the list refreshed, on failure it is
    /// kept so the operator does not retype it.
    pub async fn apply(&self, id: &str, action: WithdrawalAction) -> Result<(), SettlementError> {
        let comment = {
            let mut state = self.state.write().await;
            let item = state.get(id).ok_or(SettlementError::NotFound)?;
            if item.status.next(action).is_none() {
                return Err(SettlementError::TransitionRejected(format!(
                    "{:?} is not available for a {:?} request",
                    action, item.status
                )));
            }
            if !state.begin(id) {
                return Err(SettlementError::Busy);
            }
            state.comment_payload()
        };

        let comment = comment.as_deref();
        let result = match action {
            WithdrawalAction::Approve => self.api.approve_withdrawal(id, comment).await,
            WithdrawalAction::Reject => self.api.reject_withdrawal(id, comment).await,
            WithdrawalAction::Complete => self.api.complete_withdrawal(id, comment).await,
        };

        match result {
            Ok(()) => {
                info!("Withdrawal {} {:?} confirmed by server", id, action);
                {
                    let mut state = self.state.write().await;
                    state.finish(id);
                    state.clear_comment();
                }
                if let Err(e) = self.refresh().await {
                    warn!("Withdrawal list refresh failed: {:#}", e);
                }
                if let Err(e) = self
                    .api
                    .log_activity("withdrawal_review", &format!("{} {:?}", id, action))
                    .await
                {
                    debug!("Activity log failed: {:#}", e);
                }
                Ok(())
            }
            Err(e) => {
                warn!("Withdrawal {} {:?} rejected by server: {:#}", id, action, e);
                self.state.write().await.finish(id);
                // Resync so a stale local status cannot invite the same
                // doomed action again.
                if let Err(e) = self.refresh().await {
                    warn!("Withdrawal list refresh failed: {:#}", e);
                }
                Err(SettlementError::TransitionRejected(e.to_string()))
            }
        }
    }
}
