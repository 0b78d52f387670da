use anyhow::Result;
use maneki_shared::{WithdrawalPreview, WithdrawalRequest};

use crate::api_client::ApiClient;

#[derive(Clone)]
pub struct WithdrawalService {
    api: ApiClient,
}

impl WithdrawalService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn preview(&self, amount: f64) -> Result<WithdrawalPreview> {
        #[derive(serde::Serialize)]
        struct PreviewReq {
            amount: f64,
        }
        self.api
            .post::<WithdrawalPreview, _>("/withdrawals/preview", &PreviewReq { amount })
            .await
    }

    pub async fn submit(&self, amount: f64, method: &str, details: &str) -> Result<()> {
        #[derive(serde::Serialize)]
        struct SubmitReq<'a> {
            amount: f64,
            method: &'a str,
            details: &'a str,
        }
        let _: serde_json::Value = self
            .api
            .post(
                "/withdrawals",
                &SubmitReq {
                    amount,
                    method,
                    details,
                },
            )
            .await?;
        Ok(())
    }

    pub async fn get_withdrawals(&self) -> Result<Vec<WithdrawalRequest>> {
        self.api.get::<Vec<WithdrawalRequest>>("/withdrawals").await
    }

    pub async fn approve(&self, id: &str, comment: Option<&str>) -> Result<()> {
        self.transition(id, "approve", comment).await
    }

    pub async fn reject(&self, id: &str, comment: Option<&str>) -> Result<()> {
        self.transition(id, "reject", comment).await
    }

    pub async fn complete(&self, id: &str, comment: Option<&str>) -> Result<()> {
        self.transition(id, "complete", comment).await
    }

    async fn transition(&self, id: &str, action: &str, comment: Option<&str>) -> Result<()> {
        #[derive(serde::Serialize)]
        struct ActionReq<'a> {
            comment: Option<&'a str>,
        }
        let _: serde_json::Value = self
            .api
            .post(
                &format!("/admin/withdrawals/{}/{}", id, action),
                &ActionReq { comment },
            )
            .await?;
        Ok(())
    }
}
