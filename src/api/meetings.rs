use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::meeting::{MEETING_COLUMNS, Meeting, MeetingParticipant, is_participant};
use crate::model::user::User;
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use utoipa::ToSchema;

const UPDATABLE: &[&str] = &[
    "title",
    "description",
    "start_time",
    "end_time",
    "location",
    "is_virtual",
];

#[derive(Deserialize, ToSchema)]
pub struct CreateMeeting {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    #[serde(default)]
    pub is_virtual: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct ParticipantRequest {
    pub user_id: i64,
}

/// Meetings are visible to their organizer and to listed participants.
async fn fetch_visible(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> Result<Option<Meeting>, sqlx::Error> {
    let sql = format!(
        "SELECT {MEETING_COLUMNS} FROM meetings \
         WHERE id = ? AND is_deleted = 0 \
           AND (organizer_id = ? \
                OR id IN (SELECT meeting_id FROM meeting_participants WHERE user_id = ?))"
    );
    sqlx::query_as::<_, Meeting>(&sql)
        .bind(id)
        .bind(user_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

async fn fetch_organized(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> Result<Option<Meeting>, sqlx::Error> {
    let sql = format!(
        "SELECT {MEETING_COLUMNS} FROM meetings \
         WHERE id = ? AND organizer_id = ? AND is_deleted = 0"
    );
    sqlx::query_as::<_, Meeting>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// List meetings the caller organizes or participates in.
#[utoipa::path(
    get,
    path = "/meetings",
    responses((status = 200, description = "Meetings", body = [Meeting])),
    security(("bearer_auth" = [])),
    tag = "Meetings"
)]
pub async fn list_meetings(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let sql = format!(
        "SELECT {MEETING_COLUMNS} FROM meetings \
         WHERE is_deleted = 0 \
           AND (organizer_id = ? \
                OR id IN (SELECT meeting_id FROM meeting_participants WHERE user_id = ?)) \
         ORDER BY start_time, id"
    );
    let meetings = sqlx::query_as::<_, Meeting>(&sql)
        .bind(auth.user_id)
        .bind(auth.user_id)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(meetings))
}

/// Create a meeting with the caller as organizer.
#[utoipa::path(
    post,
    path = "/meetings",
    request_body = CreateMeeting,
    responses(
        (status = 201, description = "Meeting created", body = Meeting),
        (status = 400, description = "Invalid time range")
    ),
    security(("bearer_auth" = [])),
    tag = "Meetings"
)]
pub async fn create_meeting(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateMeeting>,
) -> Result<HttpResponse, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::validation("Title must not be empty"));
    }
    if payload.end_time <= payload.start_time {
        return Err(ApiError::validation("end_time must be after start_time"));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO meetings
            (organizer_id, title, description, start_time, end_time, location, is_virtual)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(auth.user_id)
    .bind(payload.title.trim())
    .bind(&payload.description)
    .bind(payload.start_time)
    .bind(payload.end_time)
    .bind(&payload.location)
    .bind(payload.is_virtual)
    .execute(pool.get_ref())
    .await?;

    let meeting = fetch_organized(pool.get_ref(), result.last_insert_rowid(), auth.user_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Created().json(meeting))
}

/// Get a meeting visible to the caller.
#[utoipa::path(
    get,
    path = "/meetings/{id}",
    params(("id" = i64, Path, description = "Meeting ID")),
    responses(
        (status = 200, description = "Meeting", body = Meeting),
        (status = 404, description = "Meeting not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Meetings"
)]
pub async fn get_meeting(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let meeting = fetch_visible(pool.get_ref(), path.into_inner(), auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meeting not found"))?;

    Ok(HttpResponse::Ok().json(meeting))
}

/// Update a meeting. Organizer only.
#[utoipa::path(
    put,
    path = "/meetings/{id}",
    params(("id" = i64, Path, description = "Meeting ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Meeting updated", body = Meeting),
        (status = 404, description = "Meeting not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Meetings"
)]
pub async fn update_meeting(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let meeting_id = path.into_inner();

    fetch_organized(pool.get_ref(), meeting_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meeting not found"))?;

    let update = build_update_sql("meetings", &payload, UPDATABLE, "id", meeting_id)?;
    execute_update(pool.get_ref(), update).await?;

    let meeting = fetch_organized(pool.get_ref(), meeting_id, auth.user_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(meeting))
}

/// Soft-delete a meeting. Organizer only.
#[utoipa::path(
    delete,
    path = "/meetings/{id}",
    params(("id" = i64, Path, description = "Meeting ID")),
    responses(
        (status = 200, description = "Meeting deleted"),
        (status = 404, description = "Meeting not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Meetings"
)]
pub async fn delete_meeting(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let affected = sqlx::query(
        "UPDATE meetings SET is_deleted = 1, updated_at = CURRENT_TIMESTAMP \
         WHERE id = ? AND organizer_id = ? AND is_deleted = 0",
    )
    .bind(path.into_inner())
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(ApiError::not_found("Meeting not found"));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Deleted" })))
}

/// List participants of a meeting visible to the caller.
#[utoipa::path(
    get,
    path = "/meetings/{id}/participants",
    params(("id" = i64, Path, description = "Meeting ID")),
    responses(
        (status = 200, description = "Participants", body = [MeetingParticipant]),
        (status = 404, description = "Meeting not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Meetings"
)]
pub async fn list_participants(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let meeting_id = path.into_inner();

    fetch_visible(pool.get_ref(), meeting_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meeting not found"))?;

    let participants = sqlx::query_as::<_, MeetingParticipant>(
        "SELECT meeting_id, user_id FROM meeting_participants \
         WHERE meeting_id = ? ORDER BY user_id",
    )
    .bind(meeting_id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(participants))
}

/// Add a participant. Organizer only; adding twice is acknowledged, not an error.
#[utoipa::path(
    post,
    path = "/meetings/{id}/participants",
    params(("id" = i64, Path, description = "Meeting ID")),
    request_body = ParticipantRequest,
    responses(
        (status = 201, description = "Participant added"),
        (status = 200, description = "Already a participant"),
        (status = 404, description = "Meeting or user not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Meetings"
)]
pub async fn add_participant(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<ParticipantRequest>,
) -> Result<HttpResponse, ApiError> {
    let meeting_id = path.into_inner();

    fetch_organized(pool.get_ref(), meeting_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meeting not found"))?;

    if !User::exists(pool.get_ref(), payload.user_id).await? {
        return Err(ApiError::not_found("User not found"));
    }

    if is_participant(pool.get_ref(), meeting_id, payload.user_id).await? {
        return Ok(HttpResponse::Ok().json(json!({ "message": "Already a participant" })));
    }

    sqlx::query("INSERT INTO meeting_participants (meeting_id, user_id) VALUES (?, ?)")
        .bind(meeting_id)
        .bind(payload.user_id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::Created().json(json!({ "message": "Added" })))
}

/// Remove a participant. Organizer only.
#[utoipa::path(
    delete,
    path = "/meetings/{id}/participants",
    params(("id" = i64, Path, description = "Meeting ID")),
    request_body = ParticipantRequest,
    responses(
        (status = 200, description = "Participant removed"),
        (status = 404, description = "Meeting or participant not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Meetings"
)]
pub async fn remove_participant(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<ParticipantRequest>,
) -> Result<HttpResponse, ApiError> {
    let meeting_id = path.into_inner();

    fetch_organized(pool.get_ref(), meeting_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meeting not found"))?;

    let affected =
        sqlx::query("DELETE FROM meeting_participants WHERE meeting_id = ? AND user_id = ?")
            .bind(meeting_id)
            .bind(payload.user_id)
            .execute(pool.get_ref())
            .await?
            .rows_affected();

    if affected == 0 {
        return Err(ApiError::not_found("Participant not found"));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Removed" })))
}
