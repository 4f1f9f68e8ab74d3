use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AttendanceMethod {
    Manual,
    Gps,
    Face,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Attendance {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub method: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub face_ref: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub const ATTENDANCE_COLUMNS: &str = "id, user_id, date, check_in_time, check_out_time, method, \
     latitude, longitude, face_ref, notes, created_at, updated_at";
