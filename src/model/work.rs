use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BreakType {
    Break,
    Lunch,
    Personal,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Break {
    pub id: i64,
    pub user_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub const BREAK_COLUMNS: &str =
    "id, user_id, start_time, end_time, type AS kind, created_at, updated_at";

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Schedule {
    pub id: i64,
    pub user_id: i64,
    /// 0-6 (Mon-Sun)
    pub day_of_week: i64,
    #[schema(value_type = String)]
    pub start_time: NaiveTime,
    #[schema(value_type = String)]
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub const SCHEDULE_COLUMNS: &str =
    "id, user_id, day_of_week, start_time, end_time, created_at, updated_at";
