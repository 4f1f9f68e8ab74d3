use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::attendance::{ATTENDANCE_COLUMNS, Attendance, AttendanceMethod};
use actix_web::{HttpResponse, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateAttendance {
    /// Defaults to today (UTC).
    pub date: Option<NaiveDate>,
    /// Defaults to now.
    pub check_in_time: Option<DateTime<Utc>>,
    #[schema(example = "manual")]
    pub method: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub face_ref: Option<String>,
    pub notes: Option<String>,
}

async fn fetch_owned(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> Result<Option<Attendance>, sqlx::Error> {
    let sql = format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendance \
         WHERE id = ? AND user_id = ? AND is_deleted = 0"
    );
    sqlx::query_as::<_, Attendance>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// List the caller's attendance records.
#[utoipa::path(
    get,
    path = "/attendance",
    responses((status = 200, description = "Attendance records", body = [Attendance])),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let sql = format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendance \
         WHERE user_id = ? AND is_deleted = 0 ORDER BY date DESC, id DESC"
    );
    let records = sqlx::query_as::<_, Attendance>(&sql)
        .bind(auth.user_id)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(records))
}

/// Create an attendance record (check-in) for the caller.
#[utoipa::path(
    post,
    path = "/attendance",
    request_body = CreateAttendance,
    responses(
        (status = 201, description = "Attendance created", body = Attendance),
        (status = 400, description = "Invalid method")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn create_attendance(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateAttendance>,
) -> Result<HttpResponse, ApiError> {
    // Validate before any row is persisted.
    let method = AttendanceMethod::from_str(&payload.method)
        .map_err(|_| ApiError::validation("Invalid method. Allowed: manual, gps, face"))?;

    let result = sqlx::query(
        r#"
        INSERT INTO attendance
            (user_id, date, check_in_time, method, latitude, longitude, face_ref, notes)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(auth.user_id)
    .bind(payload.date.unwrap_or_else(|| Utc::now().date_naive()))
    .bind(payload.check_in_time.unwrap_or_else(Utc::now))
    .bind(method.to_string())
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(&payload.face_ref)
    .bind(&payload.notes)
    .execute(pool.get_ref())
    .await?;

    let record = fetch_owned(pool.get_ref(), result.last_insert_rowid(), auth.user_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Created().json(record))
}

/// Set the checkout time on an attendance record, exactly once.
#[utoipa::path(
    post,
    path = "/attendance/{id}/checkout",
    params(("id" = i64, Path, description = "Attendance ID")),
    responses(
        (status = 200, description = "Checked out", body = Attendance),
        (status = 400, description = "Already checked out"),
        (status = 404, description = "Attendance not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn checkout(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let attendance_id = path.into_inner();

    let record = fetch_owned(pool.get_ref(), attendance_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Attendance not found"))?;

    if record.check_out_time.is_some() {
        return Err(ApiError::invalid_transition("Already checked out"));
    }

    sqlx::query(
        "UPDATE attendance SET check_out_time = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(Utc::now())
    .bind(attendance_id)
    .execute(pool.get_ref())
    .await?;

    let record = fetch_owned(pool.get_ref(), attendance_id, auth.user_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(record))
}
