use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::leave_request::{LEAVE_COLUMNS, LeaveRequest, LeaveStatus, LeaveType};
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use sqlx::SqlitePool;
use std::str::FromStr;
use utoipa::ToSchema;

const APPROVERS: &[&str] = &["manager", "super_admin"];
const UPDATABLE: &[&str] = &["start_date", "end_date", "type", "reason"];

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    #[schema(example = "vacation")]
    pub kind: String,
    pub reason: Option<String>,
}

fn validate_leave_type(value: &str) -> Result<(), ApiError> {
    LeaveType::from_str(value).map(|_| ()).map_err(|_| {
        ApiError::validation("Invalid leave type. Allowed: sick, vacation, personal, unpaid")
    })
}

async fn fetch_owned(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> Result<Option<LeaveRequest>, sqlx::Error> {
    let sql = format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_requests \
         WHERE id = ? AND user_id = ? AND is_deleted = 0"
    );
    sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Approvers act on any live leave, not just their own.
async fn fetch_any(pool: &SqlitePool, id: i64) -> Result<Option<LeaveRequest>, sqlx::Error> {
    let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ? AND is_deleted = 0");
    sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

async fn refetch(pool: &SqlitePool, id: i64) -> Result<LeaveRequest, ApiError> {
    fetch_any(pool, id).await?.ok_or(ApiError::Internal)
}

async fn resolve(
    pool: &SqlitePool,
    leave_id: i64,
    approver_id: i64,
    status: LeaveStatus,
) -> Result<LeaveRequest, ApiError> {
    let leave = fetch_any(pool, leave_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Leave not found"))?;

    if !leave.is_pending() {
        return Err(ApiError::invalid_transition(
            "Only pending leaves can be approved/rejected",
        ));
    }

    sqlx::query(
        "UPDATE leave_requests SET status = ?, approver_id = ?, updated_at = CURRENT_TIMESTAMP \
         WHERE id = ?",
    )
    .bind(status.to_string())
    .bind(approver_id)
    .bind(leave_id)
    .execute(pool)
    .await?;

    refetch(pool, leave_id).await
}

/// List the caller's leave requests.
#[utoipa::path(
    get,
    path = "/leaves",
    responses((status = 200, description = "Leave requests", body = [LeaveRequest])),
    security(("bearer_auth" = [])),
    tag = "Leaves"
)]
pub async fn list_leaves(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let sql = format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_requests \
         WHERE user_id = ? AND is_deleted = 0 ORDER BY id"
    );
    let leaves = sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(auth.user_id)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(leaves))
}

/// Create a leave request. Always starts pending.
#[utoipa::path(
    post,
    path = "/leaves",
    request_body = CreateLeave,
    responses(
        (status = 201, description = "Leave created", body = LeaveRequest),
        (status = 400, description = "Invalid type or date range")
    ),
    security(("bearer_auth" = [])),
    tag = "Leaves"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, ApiError> {
    validate_leave_type(&payload.kind)?;
    if payload.end_date < payload.start_date {
        return Err(ApiError::validation("end_date must not be before start_date"));
    }

    let result = sqlx::query(
        "INSERT INTO leave_requests (user_id, start_date, end_date, type, reason) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(auth.user_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(&payload.kind)
    .bind(&payload.reason)
    .execute(pool.get_ref())
    .await?;

    let leave = refetch(pool.get_ref(), result.last_insert_rowid()).await?;

    Ok(HttpResponse::Created().json(leave))
}

/// Get one of the caller's leave requests.
#[utoipa::path(
    get,
    path = "/leaves/{id}",
    params(("id" = i64, Path, description = "Leave ID")),
    responses(
        (status = 200, description = "Leave", body = LeaveRequest),
        (status = 404, description = "Leave not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leaves"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let leave = fetch_owned(pool.get_ref(), path.into_inner(), auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Leave not found"))?;

    Ok(HttpResponse::Ok().json(leave))
}

/// Update one of the caller's leave requests while it is still pending.
#[utoipa::path(
    put,
    path = "/leaves/{id}",
    params(("id" = i64, Path, description = "Leave ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Leave updated", body = LeaveRequest),
        (status = 400, description = "Leave is no longer pending"),
        (status = 404, description = "Leave not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leaves"
)]
pub async fn update_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let leave_id = path.into_inner();

    let leave = fetch_owned(pool.get_ref(), leave_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Leave not found"))?;

    if !leave.is_pending() {
        return Err(ApiError::invalid_transition(
            "Only pending leaves can be updated",
        ));
    }

    if let Some(kind) = payload.get("type") {
        let kind = kind
            .as_str()
            .ok_or_else(|| ApiError::validation("type must be a string"))?;
        validate_leave_type(kind)?;
    }

    let update = build_update_sql("leave_requests", &payload, UPDATABLE, "id", leave_id)?;
    execute_update(pool.get_ref(), update).await?;

    let leave = refetch(pool.get_ref(), leave_id).await?;

    Ok(HttpResponse::Ok().json(leave))
}

/// Cancel one of the caller's leave requests, whatever its state. The row
/// stays visible with status `cancelled`.
#[utoipa::path(
    delete,
    path = "/leaves/{id}",
    params(("id" = i64, Path, description = "Leave ID")),
    responses(
        (status = 200, description = "Leave cancelled", body = LeaveRequest),
        (status = 404, description = "Leave not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leaves"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let leave_id = path.into_inner();

    fetch_owned(pool.get_ref(), leave_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Leave not found"))?;

    sqlx::query(
        "UPDATE leave_requests SET status = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(LeaveStatus::Cancelled.to_string())
    .bind(leave_id)
    .execute(pool.get_ref())
    .await?;

    let leave = refetch(pool.get_ref(), leave_id).await?;

    Ok(HttpResponse::Ok().json(leave))
}

/// Approve a pending leave. Manager or super_admin only.
#[utoipa::path(
    post,
    path = "/leaves/{id}/approve",
    params(("id" = i64, Path, description = "Leave ID")),
    responses(
        (status = 200, description = "Leave approved", body = LeaveRequest),
        (status = 400, description = "Leave is no longer pending"),
        (status = 403, description = "Insufficient role"),
        (status = 404, description = "Leave not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leaves"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_any(APPROVERS)?;

    let leave = resolve(
        pool.get_ref(),
        path.into_inner(),
        auth.user_id,
        LeaveStatus::Approved,
    )
    .await?;

    Ok(HttpResponse::Ok().json(leave))
}

/// Reject a pending leave. Manager or super_admin only.
#[utoipa::path(
    post,
    path = "/leaves/{id}/reject",
    params(("id" = i64, Path, description = "Leave ID")),
    responses(
        (status = 200, description = "Leave rejected", body = LeaveRequest),
        (status = 400, description = "Leave is no longer pending"),
        (status = 403, description = "Insufficient role"),
        (status = 404, description = "Leave not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leaves"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_any(APPROVERS)?;

    let leave = resolve(
        pool.get_ref(),
        path.into_inner(),
        auth.user_id,
        LeaveStatus::Rejected,
    )
    .await?;

    Ok(HttpResponse::Ok().json(leave))
}
