use crate::auth::auth::AuthUser;
use crate::error::{ApiError, conflict_on_unique};
use crate::model::role::{ROLE_COLUMNS, Role};
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use utoipa::ToSchema;

const ROLE_ADMIN: &[&str] = &["super_admin"];
const UPDATABLE: &[&str] = &["name", "description"];

#[derive(Deserialize, ToSchema)]
pub struct CreateRole {
    pub name: String,
    pub description: Option<String>,
}

async fn fetch_role(pool: &SqlitePool, id: i64) -> Result<Option<Role>, sqlx::Error> {
    let sql = format!("SELECT {ROLE_COLUMNS} FROM roles WHERE id = ? AND is_deleted = 0");
    sqlx::query_as::<_, Role>(&sql).bind(id).fetch_optional(pool).await
}

/// List roles (super_admin only).
#[utoipa::path(
    get,
    path = "/roles",
    responses((status = 200, description = "Roles", body = [Role])),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn list_roles(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_any(ROLE_ADMIN)?;

    let sql = format!("SELECT {ROLE_COLUMNS} FROM roles WHERE is_deleted = 0 ORDER BY id");
    let roles = sqlx::query_as::<_, Role>(&sql)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(roles))
}

/// Create a role (super_admin only).
#[utoipa::path(
    post,
    path = "/roles",
    request_body = CreateRole,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 409, description = "Role exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn create_role(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateRole>,
) -> Result<HttpResponse, ApiError> {
    auth.require_any(ROLE_ADMIN)?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Role name must not be empty"));
    }

    let result = sqlx::query("INSERT INTO roles (name, description) VALUES (?, ?)")
        .bind(name)
        .bind(&payload.description)
        .execute(pool.get_ref())
        .await
        .map_err(|e| conflict_on_unique(e, "Role exists"))?;

    let role = fetch_role(pool.get_ref(), result.last_insert_rowid())
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Created().json(role))
}

/// Get a role (super_admin only).
#[utoipa::path(
    get,
    path = "/roles/{id}",
    params(("id" = i64, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role", body = Role),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn get_role(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_any(ROLE_ADMIN)?;

    let role = fetch_role(pool.get_ref(), path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Role not found"))?;

    Ok(HttpResponse::Ok().json(role))
}

/// Update a role (super_admin only).
#[utoipa::path(
    put,
    path = "/roles/{id}",
    params(("id" = i64, Path, description = "Role ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Role updated", body = Role),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn update_role(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    auth.require_any(ROLE_ADMIN)?;

    let role_id = path.into_inner();

    let update = build_update_sql("roles", &payload, UPDATABLE, "id", role_id)?;
    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(|e| conflict_on_unique(e, "Role exists"))?;

    if affected == 0 {
        return Err(ApiError::not_found("Role not found"));
    }

    let role = fetch_role(pool.get_ref(), role_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(role))
}

/// Soft-delete a role (super_admin only).
#[utoipa::path(
    delete,
    path = "/roles/{id}",
    params(("id" = i64, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role deleted"),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
pub async fn delete_role(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_any(ROLE_ADMIN)?;

    let affected = sqlx::query(
        "UPDATE roles SET is_deleted = 1, updated_at = CURRENT_TIMESTAMP \
         WHERE id = ? AND is_deleted = 0",
    )
    .bind(path.into_inner())
    .execute(pool.get_ref())
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(ApiError::not_found("Role not found"));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Deleted" })))
}
