use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use utoipa::ToSchema;

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Meeting {
    pub id: i64,
    pub organizer_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub is_virtual: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub const MEETING_COLUMNS: &str = "id, organizer_id, title, description, start_time, end_time, \
     location, is_virtual, created_at, updated_at";

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct MeetingParticipant {
    pub meeting_id: i64,
    pub user_id: i64,
}

pub async fn is_participant(
    pool: &SqlitePool,
    meeting_id: i64,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM meeting_participants WHERE meeting_id = ? AND user_id = ?)",
    )
    .bind(meeting_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
}
