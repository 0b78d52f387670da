use anyhow::Result;

use crate::api_client::ApiClient;

/// Audit trail of settlement actions. Logging is best-effort, a failed
/// log call never surfaces to the user.
#[derive(Clone)]
pub struct ActivityService {
    api: ApiClient,
}

impl ActivityService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn log(&self, action: &str, details: &str) -> Result<()> {
        #[derive(serde::Serialize)]
        struct LogReq<'a> {
            action: &'a str,
            details: &'a str,
        }
        let _: serde_json::Value = self
            .api
            .post("/logs/activity", &LogReq { action, details })
            .await?;
        Ok(())
    }
}
