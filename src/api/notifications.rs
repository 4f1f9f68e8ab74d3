use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::notification::{NOTIFICATION_COLUMNS, Notification, NotificationLevel};
use crate::model::user::User;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::str::FromStr;
use utoipa::ToSchema;

const SENDERS: &[&str] = &["manager", "super_admin"];

#[derive(Deserialize, ToSchema)]
pub struct CreateNotification {
    pub user_id: i64,
    pub title: String,
    pub message: String,
    #[schema(example = "info")]
    pub level: Option<String>,
}

async fn fetch_owned(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> Result<Option<Notification>, sqlx::Error> {
    let sql = format!(
        "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
         WHERE id = ? AND user_id = ? AND is_deleted = 0"
    );
    sqlx::query_as::<_, Notification>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// List the caller's notifications, newest first.
#[utoipa::path(
    get,
    path = "/notifications",
    responses((status = 200, description = "Notifications", body = [Notification])),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn list_notifications(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let sql = format!(
        "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
         WHERE user_id = ? AND is_deleted = 0 ORDER BY id DESC"
    );
    let notifications = sqlx::query_as::<_, Notification>(&sql)
        .bind(auth.user_id)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(notifications))
}

/// Send a notification to a user. Manager or super_admin only.
#[utoipa::path(
    post,
    path = "/notifications",
    request_body = CreateNotification,
    responses(
        (status = 201, description = "Notification created", body = Notification),
        (status = 403, description = "Insufficient role"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn create_notification(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateNotification>,
) -> Result<HttpResponse, ApiError> {
    auth.require_any(SENDERS)?;

    let level = payload.level.as_deref().unwrap_or("info");
    NotificationLevel::from_str(level).map_err(|_| {
        ApiError::validation("Invalid level. Allowed: info, warning, critical")
    })?;

    if !User::exists(pool.get_ref(), payload.user_id).await? {
        return Err(ApiError::not_found("User not found"));
    }

    let result = sqlx::query(
        "INSERT INTO notifications (user_id, title, message, level) VALUES (?, ?, ?, ?)",
    )
    .bind(payload.user_id)
    .bind(&payload.title)
    .bind(&payload.message)
    .bind(level)
    .execute(pool.get_ref())
    .await?;

    let notification = fetch_owned(pool.get_ref(), result.last_insert_rowid(), payload.user_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Created().json(notification))
}

/// Mark one of the caller's notifications as read. Idempotent.
#[utoipa::path(
    post,
    path = "/notifications/{id}/read",
    params(("id" = i64, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked read", body = Notification),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn mark_read(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let notification_id = path.into_inner();

    fetch_owned(pool.get_ref(), notification_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification not found"))?;

    sqlx::query(
        "UPDATE notifications SET is_read = 1, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(notification_id)
    .execute(pool.get_ref())
    .await?;

    let notification = fetch_owned(pool.get_ref(), notification_id, auth.user_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(notification))
}
