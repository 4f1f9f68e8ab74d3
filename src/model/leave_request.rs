use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Sick,
    Vacation,
    Personal,
    Unpaid,
}

/// Status machine: pending -> approved | rejected (role-gated); the owner
/// may cancel from any state. Approve/reject and owner edits act on pending
/// requests only.
#[derive(Debug, Serialize, Deserialize, Display, EnumString, PartialEq, Eq, ToSchema)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct LeaveRequest {
    pub id: i64,
    pub user_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: String,
    pub reason: Option<String>,
    pub status: String,
    pub approver_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub const LEAVE_COLUMNS: &str = "id, user_id, start_date, end_date, type AS kind, reason, status, \
     approver_id, created_at, updated_at";

impl LeaveRequest {
    pub fn is_pending(&self) -> bool {
        self.status == LeaveStatus::Pending.to_string()
    }
}
