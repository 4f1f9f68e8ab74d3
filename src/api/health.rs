use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;

/// Liveness probe with a database ping.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service health")),
    tag = "Health"
)]
pub async fn health(pool: web::Data<SqlitePool>) -> HttpResponse {
    let database = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(pool.get_ref())
        .await
    {
        Ok(_) => "ok",
        Err(_) => "unavailable",
    };

    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "database": database
    }))
}
