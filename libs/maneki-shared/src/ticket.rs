use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::{IssueType, TicketStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: String,
    pub status: TicketStatus,
    pub issue_type: IssueType,
    pub subject: String,
    pub message: String,
    /// Account credentials for the purchased good. Sensitive, shown
    /// only to the reviewer.
    pub credentials: Option<String>,
    pub order_id: Option<String>,
    pub item_id: Option<String>,
    pub admin_comment: Option<String>,
    pub created_at: DateTime<Utc>,
}
