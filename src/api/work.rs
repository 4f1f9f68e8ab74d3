use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::work::{BREAK_COLUMNS, Break, BreakType, SCHEDULE_COLUMNS, Schedule};
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{HttpResponse, web};
use chrono::{DateTime, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use std::str::FromStr;
use utoipa::ToSchema;

const BREAK_UPDATABLE: &[&str] = &["start_time", "end_time", "type"];
const SCHEDULE_UPDATABLE: &[&str] = &["day_of_week", "start_time", "end_time"];

#[derive(Deserialize, ToSchema)]
pub struct CreateBreak {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    #[schema(example = "lunch")]
    pub kind: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateSchedule {
    /// 0-6 (Mon-Sun)
    pub day_of_week: i64,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "17:00:00")]
    pub end_time: NaiveTime,
}

fn validate_break_type(value: &str) -> Result<(), ApiError> {
    BreakType::from_str(value)
        .map(|_| ())
        .map_err(|_| ApiError::validation("Invalid break type. Allowed: break, lunch, personal"))
}

fn validate_day_of_week(value: i64) -> Result<(), ApiError> {
    if (0..=6).contains(&value) {
        Ok(())
    } else {
        Err(ApiError::validation("day_of_week must be between 0 and 6"))
    }
}

async fn fetch_owned_break(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> Result<Option<Break>, sqlx::Error> {
    let sql =
        format!("SELECT {BREAK_COLUMNS} FROM breaks WHERE id = ? AND user_id = ? AND is_deleted = 0");
    sqlx::query_as::<_, Break>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

async fn fetch_owned_schedule(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> Result<Option<Schedule>, sqlx::Error> {
    let sql = format!(
        "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = ? AND user_id = ? AND is_deleted = 0"
    );
    sqlx::query_as::<_, Schedule>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// List the caller's breaks.
#[utoipa::path(
    get,
    path = "/work/breaks",
    responses((status = 200, description = "Breaks", body = [Break])),
    security(("bearer_auth" = [])),
    tag = "Work"
)]
pub async fn list_breaks(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let sql = format!(
        "SELECT {BREAK_COLUMNS} FROM breaks WHERE user_id = ? AND is_deleted = 0 ORDER BY id"
    );
    let breaks = sqlx::query_as::<_, Break>(&sql)
        .bind(auth.user_id)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(breaks))
}

/// Create a break for the caller.
#[utoipa::path(
    post,
    path = "/work/breaks",
    request_body = CreateBreak,
    responses((status = 201, description = "Break created", body = Break)),
    security(("bearer_auth" = [])),
    tag = "Work"
)]
pub async fn create_break(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateBreak>,
) -> Result<HttpResponse, ApiError> {
    let kind = payload.kind.as_deref().unwrap_or("break");
    validate_break_type(kind)?;

    let result = sqlx::query(
        "INSERT INTO breaks (user_id, start_time, end_time, type) VALUES (?, ?, ?, ?)",
    )
    .bind(auth.user_id)
    .bind(payload.start_time)
    .bind(payload.end_time)
    .bind(kind)
    .execute(pool.get_ref())
    .await?;

    let row = fetch_owned_break(pool.get_ref(), result.last_insert_rowid(), auth.user_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Created().json(row))
}

/// Update one of the caller's breaks.
#[utoipa::path(
    put,
    path = "/work/breaks/{id}",
    params(("id" = i64, Path, description = "Break ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Break updated", body = Break),
        (status = 404, description = "Break not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Work"
)]
pub async fn update_break(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let break_id = path.into_inner();

    fetch_owned_break(pool.get_ref(), break_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Break not found"))?;

    if let Some(kind) = payload.get("type") {
        let kind = kind
            .as_str()
            .ok_or_else(|| ApiError::validation("type must be a string"))?;
        validate_break_type(kind)?;
    }

    let update = build_update_sql("breaks", &payload, BREAK_UPDATABLE, "id", break_id)?;
    execute_update(pool.get_ref(), update).await?;

    let row = fetch_owned_break(pool.get_ref(), break_id, auth.user_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(row))
}

/// Soft-delete one of the caller's breaks.
#[utoipa::path(
    delete,
    path = "/work/breaks/{id}",
    params(("id" = i64, Path, description = "Break ID")),
    responses(
        (status = 200, description = "Break deleted"),
        (status = 404, description = "Break not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Work"
)]
pub async fn delete_break(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let affected = sqlx::query(
        "UPDATE breaks SET is_deleted = 1, updated_at = CURRENT_TIMESTAMP \
         WHERE id = ? AND user_id = ? AND is_deleted = 0",
    )
    .bind(path.into_inner())
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(ApiError::not_found("Break not found"));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Deleted" })))
}

/// List the caller's schedules.
#[utoipa::path(
    get,
    path = "/work/schedules",
    responses((status = 200, description = "Schedules", body = [Schedule])),
    security(("bearer_auth" = [])),
    tag = "Work"
)]
pub async fn list_schedules(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let sql = format!(
        "SELECT {SCHEDULE_COLUMNS} FROM schedules \
         WHERE user_id = ? AND is_deleted = 0 ORDER BY day_of_week, id"
    );
    let schedules = sqlx::query_as::<_, Schedule>(&sql)
        .bind(auth.user_id)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(schedules))
}

/// Create a schedule entry for the caller.
#[utoipa::path(
    post,
    path = "/work/schedules",
    request_body = CreateSchedule,
    responses(
        (status = 201, description = "Schedule created", body = Schedule),
        (status = 400, description = "Invalid day_of_week")
    ),
    security(("bearer_auth" = [])),
    tag = "Work"
)]
pub async fn create_schedule(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateSchedule>,
) -> Result<HttpResponse, ApiError> {
    validate_day_of_week(payload.day_of_week)?;

    let result = sqlx::query(
        "INSERT INTO schedules (user_id, day_of_week, start_time, end_time) VALUES (?, ?, ?, ?)",
    )
    .bind(auth.user_id)
    .bind(payload.day_of_week)
    .bind(payload.start_time)
    .bind(payload.end_time)
    .execute(pool.get_ref())
    .await?;

    let row = fetch_owned_schedule(pool.get_ref(), result.last_insert_rowid(), auth.user_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Created().json(row))
}

/// Update one of the caller's schedules.
#[utoipa::path(
    put,
    path = "/work/schedules/{id}",
    params(("id" = i64, Path, description = "Schedule ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Schedule updated", body = Schedule),
        (status = 404, description = "Schedule not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Work"
)]
pub async fn update_schedule(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let schedule_id = path.into_inner();

    fetch_owned_schedule(pool.get_ref(), schedule_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Schedule not found"))?;

    if let Some(day) = payload.get("day_of_week") {
        let day = day
            .as_i64()
            .ok_or_else(|| ApiError::validation("day_of_week must be an integer"))?;
        validate_day_of_week(day)?;
    }

    let update = build_update_sql("schedules", &payload, SCHEDULE_UPDATABLE, "id", schedule_id)?;
    execute_update(pool.get_ref(), update).await?;

    let row = fetch_owned_schedule(pool.get_ref(), schedule_id, auth.user_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(row))
}

/// Soft-delete one of the caller's schedules.
#[utoipa::path(
    delete,
    path = "/work/schedules/{id}",
    params(("id" = i64, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Schedule deleted"),
        (status = 404, description = "Schedule not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Work"
)]
pub async fn delete_schedule(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let affected = sqlx::query(
        "UPDATE schedules SET is_deleted = 1, updated_at = CURRENT_TIMESTAMP \
         WHERE id = ? AND user_id = ? AND is_deleted = 0",
    )
    .bind(path.into_inner())
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(ApiError::not_found("Schedule not found"));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Deleted" })))
}
