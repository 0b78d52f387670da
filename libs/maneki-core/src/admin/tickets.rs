use std::sync::Arc;

use anyhow::Result;
use maneki_shared::{SupportTicket, TicketAction, TicketStatus};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::admin::queue::{ReviewItem, ReviewQueueState};
use crate::api::SettlementApi;
use crate::error::SettlementError;

impl ReviewItem for SupportTicket {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Operator queue over open support tickets. Same select-then-act
/// protocol as the withdrawal queue with a single resolve action.
#[derive(Clone)]
pub struct TicketQueue {
    api: Arc<dyn SettlementApi>,
    state: Arc<RwLock<ReviewQueueState<SupportTicket>>>,
}

impl TicketQueue {
    pub fn new(api: Arc<dyn SettlementApi>) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(ReviewQueueState::default())),
        }
    }

    pub async fn refresh(&self) -> Result<()> {
        let items = self.api.get_tickets().await?;
        self.state.write().await.set_items(items);
        Ok(())
    }

    pub async fn items(&self) -> Vec<SupportTicket> {
        self.state.read().await.items().to_vec()
    }

    pub async fn pending_count(&self) -> usize {
        self.state
            .read()
            .await
            .items()
            .iter()
            .filter(|t| t.status.is_open())
            .count()
    }

    pub async fn select(&self, id: Option<&str>) {
        self.state.write().await.select(id);
    }

    pub async fn selected(&self) -> Option<SupportTicket> {
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

    pub async fn can_resolve(&self, id: &str) -> bool {
        matches!(
            self.state.read().await.get(id).map(|t| t.status),
            Some(TicketStatus::Open)
        )
    }

    pub async fn resolve(&self, id: &str, approve: bool) -> Result<(), SettlementError> {
        let comment = {
            let mut state = self.state.write().await;
            let item = state.get(id).ok_or(SettlementError::NotFound)?;
            if item.status.next(TicketAction::Resolve { approve }).is_none() {
                return Err(SettlementError::TransitionRejected(format!(
                    "a {:?} ticket cannot be resolved",
                    item.status
                )));
            }
            if !state.begin(id) {
                return Err(SettlementError::Busy);
            }
            state.comment_payload()
        };

        let result = self.api.resolve_ticket(id, approve, comment.as_deref()).await;

        match result {
            Ok(()) => {
                info!("Ticket {} resolved (approve = {})", id, approve);
                {
                    let mut state = self.state.write().await;
                    state.finish(id);
                    state.clear_comment();
                }
                if let Err(e) = self.refresh().await {
                    warn!("Ticket list refresh failed: {:#}", e);
                }
                if let Err(e) = self
                    .api
                    .log_activity("ticket_review", &format!("{} approve={}", id, approve))
                    .await
                {
                    debug!("Activity log failed: {:#}", e);
                }
                Ok(())
            }
            Err(e) => {
                warn!("Ticket {} resolve rejected by server: {:#}", id, e);
                self.state.write().await.finish(id);
                if let Err(e) = self.refresh().await {
                    warn!("Ticket list refresh failed: {:#}", e);
                }
                Err(SettlementError::TransitionRejected(e.to_string()))
            }
        }
    }
}
