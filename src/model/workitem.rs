use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
    Blocked,
}

#[derive(Debug, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub owner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub const PROJECT_COLUMNS: &str =
    "id, name, description, start_date, end_date, owner_id, created_at, updated_at";

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Task {
    pub id: i64,
    pub project_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<NaiveDate>,
    pub assignee_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub const TASK_COLUMNS: &str = "id, project_id, title, description, status, priority, due_date, \
     assignee_id, created_at, updated_at";

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn task_status_uses_snake_case() {
        assert!(TaskStatus::from_str("in_progress").is_ok());
        assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
        assert!(TaskStatus::from_str("started").is_err());
    }

    #[test]
    fn task_priority_parses_all_levels() {
        for p in ["low", "medium", "high", "urgent"] {
            assert!(TaskPriority::from_str(p).is_ok(), "{p} should parse");
        }
        assert!(TaskPriority::from_str("asap").is_err());
    }
}
