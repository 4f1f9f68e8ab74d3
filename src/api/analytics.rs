use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use actix_web::{HttpResponse, web};
use serde_json::{Map, Value, json};
use sqlx::{Row, SqlitePool};

const VIEWERS: &[&str] = &["manager", "super_admin"];

async fn grouped_counts(
    pool: &SqlitePool,
    sql: &str,
) -> Result<Map<String, Value>, sqlx::Error> {
    let rows = sqlx::query(sql).fetch_all(pool).await?;
    let mut counts = Map::new();
    for row in rows {
        let key: String = row.try_get("key")?;
        let count: i64 = row.try_get("count")?;
        counts.insert(key, json!(count));
    }
    Ok(counts)
}

/// Attendance totals and per-method breakdown. Manager or super_admin only.
#[utoipa::path(
    get,
    path = "/analytics/attendance/summary",
    responses(
        (status = 200, description = "Attendance summary"),
        (status = 403, description = "Insufficient role")
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn attendance_summary(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_any(VIEWERS)?;

    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance WHERE is_deleted = 0",
    )
    .fetch_one(pool.get_ref())
    .await?;

    let open = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance WHERE is_deleted = 0 AND check_out_time IS NULL",
    )
    .fetch_one(pool.get_ref())
    .await?;

    let by_method = grouped_counts(
        pool.get_ref(),
        "SELECT method AS key, COUNT(*) AS count FROM attendance \
         WHERE is_deleted = 0 GROUP BY method",
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "total": total,
        "open": open,
        "by_method": by_method
    })))
}

/// Task counts grouped by status. Manager or super_admin only.
#[utoipa::path(
    get,
    path = "/analytics/tasks/status",
    responses(
        (status = 200, description = "Task status counts"),
        (status = 403, description = "Insufficient role")
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn task_status(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_any(VIEWERS)?;

    let by_status = grouped_counts(
        pool.get_ref(),
        "SELECT status AS key, COUNT(*) AS count FROM tasks \
         WHERE is_deleted = 0 GROUP BY status",
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "by_status": by_status })))
}

/// Count of leave requests awaiting a decision. Manager or super_admin only.
#[utoipa::path(
    get,
    path = "/analytics/leaves/pending",
    responses(
        (status = 200, description = "Pending leave count"),
        (status = 403, description = "Insufficient role")
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn pending_leaves(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_any(VIEWERS)?;

    let pending = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM leave_requests WHERE is_deleted = 0 AND status = 'pending'",
    )
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "pending": pending })))
}

/// Count of unread notifications across all users. Manager or super_admin only.
#[utoipa::path(
    get,
    path = "/analytics/notifications/unread",
    responses(
        (status = 200, description = "Unread notification count"),
        (status = 403, description = "Insufficient role")
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn unread_notifications(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_any(VIEWERS)?;

    let unread = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications WHERE is_deleted = 0 AND is_read = 0",
    )
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "unread": unread })))
}
