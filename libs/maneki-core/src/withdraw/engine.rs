use std::sync::Arc;

use maneki_shared::WithdrawalPreview;
use maneki_shared::api::Balance;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::SettlementApi;
use crate::error::{SettlementError, ValidationError};
use crate::withdraw::fee;

#[derive(Debug, Clone)]
struct CurrentPreview {
    generation: u64,
    amount: f64,
    preview: WithdrawalPreview,
}

#[derive(Debug)]
struct EngineState {
    balance: Option<Balance>,
    min_amount: f64,
    max_amount: Option<f64>,
    /// Bumped on every amount edit. A preview resolving under an older
    /// generation is stale and is discarded instead of stored.
    generation: u64,
    preview: Option<CurrentPreview>,
    submitting: bool,
}

/// Client-side guard in front of withdrawal submission: validates the
/// amount and destination against balance and limits, owns the preview
/// round-trip, and refuses to submit on anything but a current,
/// fee-cleared preview. A UX guard only; the server re-enforces all of
/// it.
#[derive(Clone)]
pub struct WithdrawalRequestEngine {
    api: Arc<dyn SettlementApi>,
    state: Arc<Mutex<EngineState>>,
}

impl WithdrawalRequestEngine {
    pub fn new(api: Arc<dyn SettlementApi>, min_amount: f64) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(EngineState {
                balance: None,
                min_amount,
                max_amount: None,
                generation: 0,
                preview: None,
                submitting: false,
            })),
        }
    }

    /// Server-configured cap; the cap falls back to the current balance
    /// when unset.
    pub async fn set_max_amount(&self, max: Option<f64>) {
        self.state.lock().await.max_amount = max;
    }

    /// Balance is server truth. It is refetched after every action that
    /// can change it and never computed locally.
    pub async fn refresh_balance(&self) -> anyhow::Result<Balance> {
        let balance = self.api.get_balance().await?;
        self.state.lock().await.balance = Some(balance.clone());
        Ok(balance)
    }

    pub async fn balance(&self) -> Option<Balance> {
        self.state.lock().await.balance.clone()
    }

    pub async fn current_preview(&self) -> Option<WithdrawalPreview> {
        let state = self.state.lock().await;
        state
            .preview
            .as_ref()
            .filter(|c| c.generation == state.generation)
            .map(|c| c.preview)
    }

    /// Fetch a fresh fee preview for an edited amount. Any preview still
    /// in flight for a previous edit is invalidated immediately, so a
    /// stale result can never pass validation for the new amount.
    pub async fn request_preview(
        &self,
        amount: f64,
    ) -> Result<WithdrawalPreview, SettlementError> {
        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.preview = None;
            state.generation
        };

        let preview = self.api.preview_withdrawal(amount).await?;

        let mut state = self.state.lock().await;
        if state.generation == generation {
            state.preview = Some(CurrentPreview {
                generation,
                amount,
                preview,
            });
        } else {
            debug!("Discarding stale withdrawal preview for amount {}", amount);
        }
        Ok(preview)
    }

    /// Run the pre-submission checks for the current input. Errors are
    /// reported inline and never block a retry.
    pub async fn validate(&self, amount: f64, details: &str) -> Result<(), ValidationError> {
        let state = self.state.lock().await;
        let preview = state
            .preview
            .as_ref()
            .filter(|c| c.generation == state.generation && c.amount == amount)
            .map(|c| c.preview);
        validate_request(
            amount,
            details,
            state.balance.as_ref(),
            state.min_amount,
            state.max_amount,
            preview.as_ref(),
        )
    }

    /// Submit the withdrawal. Requires a current preview for exactly
    /// this amount; while a newer preview is still in flight submission
    /// stays blocked.
    pub async fn submit(
        &self,
        amount: f64,
        method: &str,
        details: &str,
    ) -> Result<(), SettlementError> {
        {
            let mut state = self.state.lock().await;
            if state.submitting {
                return Err(SettlementError::Busy);
            }
            let preview = state
                .preview
                .as_ref()
                .filter(|c| c.generation == state.generation && c.amount == amount)
                .map(|c| c.preview);
            validate_request(
                amount,
                details,
                state.balance.as_ref(),
                state.min_amount,
                state.max_amount,
                preview.as_ref(),
            )?;
            if preview.is_none() {
                return Err(SettlementError::PreviewPending);
            }
            state.submitting = true;
        }

        let result = self.api.submit_withdrawal(amount, method, details).await;

        let mut state = self.state.lock().await;
        state.submitting = false;
        match result {
            Ok(()) => {
                info!("Withdrawal of {} submitted", amount);
                // The consumed preview must not validate a second
                // submission.
                state.generation += 1;
                state.preview = None;
                drop(state);

                if let Err(e) = self.refresh_balance().await {
                    warn!("Balance refresh after withdrawal failed: {:#}", e);
                }
                if let Err(e) = self
                    .api
                    .log_activity("withdrawal_submitted", &format!("amount {}", amount))
                    .await
                {
                    debug!("Activity log failed: {:#}", e);
                }
                Ok(())
            }
            Err(e) => Err(SettlementError::Api(e)),
        }
    }
}

/// The pre-submission checks, short-circuiting in a fixed sequence so
/// the user always sees the most fundamental problem first.
fn validate_request(
    amount: f64,
    details: &str,
    balance: Option<&Balance>,
    min_amount: f64,
    max_amount: Option<f64>,
    preview: Option<&WithdrawalPreview>,
) -> Result<(), ValidationError> {
    let currency = balance.map_or("USD", |b| b.currency.as_str());
    let available = balance.map_or(0.0, |b| b.amount);

    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::AmountMissing);
    }
    if amount < min_amount {
        return Err(ValidationError::BelowMinimum {
            min: min_amount,
            currency: currency.to_string(),
        });
    }
    let max = max_amount.unwrap_or(available);
    if amount > max {
        return Err(ValidationError::AboveMaximum {
            max,
            currency: currency.to_string(),
        });
    }
    if amount > available {
        return Err(ValidationError::InsufficientFunds);
    }
    if let Some(p) = preview {
        if !(p.can_withdraw && fee::can_withdraw(p.amount_gross, p.amount_net)) {
            return Err(ValidationError::BelowFeeFloor {
                floor: fee::MIN_NET_PAYOUT,
                currency: "USDT".to_string(),
            });
        }
    }
    if details.trim().is_empty() {
        return Err(ValidationError::DestinationMissing);
    }
    Ok(())
}
