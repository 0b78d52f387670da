use anyhow::Result;
use maneki_shared::SupportTicket;
use maneki_shared::api::SubmitTicketRequest;

use crate::api_client::ApiClient;

#[derive(Clone)]
pub struct TicketService {
    api: ApiClient,
}

impl TicketService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_tickets(&self) -> Result<Vec<SupportTicket>> {
        self.api.get::<Vec<SupportTicket>>("/tickets").await
    }

    pub async fn submit(&self, req: &SubmitTicketRequest) -> Result<SupportTicket> {
        self.api.post::<SupportTicket, _>("/tickets", req).await
    }

    pub async fn resolve(&self, id: &str, approve: bool, comment: Option<&str>) -> Result<()> {
        #[derive(serde::Serialize)]
        struct ResolveReq<'a> {
            approve: bool,
            comment: Option<&'a str>,
        }
        let _: serde_json::Value = self
            .api
            .post(
                &format!("/admin/tickets/{}/resolve", id),
                &ResolveReq { approve, comment },
            )
            .await?;
        Ok(())
    }
}
