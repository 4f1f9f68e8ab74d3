use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::workitem::{
    PROJECT_COLUMNS, Project, TASK_COLUMNS, Task, TaskPriority, TaskStatus,
};
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use std::str::FromStr;
use utoipa::ToSchema;

const PROJECT_UPDATABLE: &[&str] = &["name", "description", "start_date", "end_date", "owner_id"];
const TASK_UPDATABLE: &[&str] = &[
    "project_id",
    "title",
    "description",
    "status",
    "priority",
    "due_date",
    "assignee_id",
];

#[derive(Deserialize, ToSchema)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Defaults to the caller.
    pub owner_id: Option<i64>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateTask {
    pub project_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "todo")]
    pub status: Option<String>,
    #[schema(example = "medium")]
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub assignee_id: Option<i64>,
}

fn validate_status(value: &str) -> Result<(), ApiError> {
    TaskStatus::from_str(value).map(|_| ()).map_err(|_| {
        ApiError::validation("Invalid status. Allowed: todo, in_progress, done, blocked")
    })
}

fn validate_priority(value: &str) -> Result<(), ApiError> {
    TaskPriority::from_str(value).map(|_| ()).map_err(|_| {
        ApiError::validation("Invalid priority. Allowed: low, medium, high, urgent")
    })
}

async fn fetch_project(pool: &SqlitePool, id: i64) -> Result<Option<Project>, sqlx::Error> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ? AND is_deleted = 0");
    sqlx::query_as::<_, Project>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

async fn fetch_task(pool: &SqlitePool, id: i64) -> Result<Option<Task>, sqlx::Error> {
    let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ? AND is_deleted = 0");
    sqlx::query_as::<_, Task>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// List all projects. Projects are shared, not per-user.
#[utoipa::path(
    get,
    path = "/workitems/projects",
    responses((status = 200, description = "Projects", body = [Project])),
    security(("bearer_auth" = [])),
    tag = "Work Items"
)]
pub async fn list_projects(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE is_deleted = 0 ORDER BY id");
    let projects = sqlx::query_as::<_, Project>(&sql)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(projects))
}

/// Create a project, owned by the caller unless an owner is named.
#[utoipa::path(
    post,
    path = "/workitems/projects",
    request_body = CreateProject,
    responses((status = 201, description = "Project created", body = Project)),
    security(("bearer_auth" = [])),
    tag = "Work Items"
)]
pub async fn create_project(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateProject>,
) -> Result<HttpResponse, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Project name must not be empty"));
    }

    let result = sqlx::query(
        "INSERT INTO projects (name, description, start_date, end_date, owner_id) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(payload.name.trim())
    .bind(&payload.description)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.owner_id.unwrap_or(auth.user_id))
    .execute(pool.get_ref())
    .await?;

    let project = fetch_project(pool.get_ref(), result.last_insert_rowid())
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Created().json(project))
}

/// Get a project.
#[utoipa::path(
    get,
    path = "/workitems/projects/{id}",
    params(("id" = i64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project", body = Project),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Work Items"
)]
pub async fn get_project(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let project = fetch_project(pool.get_ref(), path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    Ok(HttpResponse::Ok().json(project))
}

/// Update a project.
#[utoipa::path(
    put,
    path = "/workitems/projects/{id}",
    params(("id" = i64, Path, description = "Project ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Work Items"
)]
pub async fn update_project(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let project_id = path.into_inner();

    let update = build_update_sql("projects", &payload, PROJECT_UPDATABLE, "id", project_id)?;
    let affected = execute_update(pool.get_ref(), update).await?;

    if affected == 0 {
        return Err(ApiError::not_found("Project not found"));
    }

    let project = fetch_project(pool.get_ref(), project_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(project))
}

/// Soft-delete a project.
#[utoipa::path(
    delete,
    path = "/workitems/projects/{id}",
    params(("id" = i64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project deleted"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Work Items"
)]
pub async fn delete_project(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let affected = sqlx::query(
        "UPDATE projects SET is_deleted = 1, updated_at = CURRENT_TIMESTAMP \
         WHERE id = ? AND is_deleted = 0",
    )
    .bind(path.into_inner())
    .execute(pool.get_ref())
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(ApiError::not_found("Project not found"));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Deleted" })))
}

/// List all tasks.
#[utoipa::path(
    get,
    path = "/workitems/tasks",
    responses((status = 200, description = "Tasks", body = [Task])),
    security(("bearer_auth" = [])),
    tag = "Work Items"
)]
pub async fn list_tasks(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE is_deleted = 0 ORDER BY id");
    let tasks = sqlx::query_as::<_, Task>(&sql)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Create a task.
#[utoipa::path(
    post,
    path = "/workitems/tasks",
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Invalid status or priority"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Work Items"
)]
pub async fn create_task(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateTask>,
) -> Result<HttpResponse, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::validation("Title must not be empty"));
    }

    let status = payload.status.as_deref().unwrap_or("todo");
    validate_status(status)?;
    let priority = payload.priority.as_deref().unwrap_or("medium");
    validate_priority(priority)?;

    if let Some(project_id) = payload.project_id {
        fetch_project(pool.get_ref(), project_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Project not found"))?;
    }

    let result = sqlx::query(
        r#"
        INSERT INTO tasks
            (project_id, title, description, status, priority, due_date, assignee_id)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.project_id)
    .bind(payload.title.trim())
    .bind(&payload.description)
    .bind(status)
    .bind(priority)
    .bind(payload.due_date)
    .bind(payload.assignee_id)
    .execute(pool.get_ref())
    .await?;

    let task = fetch_task(pool.get_ref(), result.last_insert_rowid())
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Created().json(task))
}

/// Get a task.
#[utoipa::path(
    get,
    path = "/workitems/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task", body = Task),
        (status = 404, description = "Task not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Work Items"
)]
pub async fn get_task(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let task = fetch_task(pool.get_ref(), path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Update a task. Enum-valued fields are re-validated.
#[utoipa::path(
    put,
    path = "/workitems/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 404, description = "Task not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Work Items"
)]
pub async fn update_task(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let task_id = path.into_inner();

    if let Some(status) = payload.get("status") {
        let status = status
            .as_str()
            .ok_or_else(|| ApiError::validation("status must be a string"))?;
        validate_status(status)?;
    }
    if let Some(priority) = payload.get("priority") {
        let priority = priority
            .as_str()
            .ok_or_else(|| ApiError::validation("priority must be a string"))?;
        validate_priority(priority)?;
    }

    let update = build_update_sql("tasks", &payload, TASK_UPDATABLE, "id", task_id)?;
    let affected = execute_update(pool.get_ref(), update).await?;

    if affected == 0 {
        return Err(ApiError::not_found("Task not found"));
    }

    let task = fetch_task(pool.get_ref(), task_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(task))
}

/// Soft-delete a task.
#[utoipa::path(
    delete,
    path = "/workitems/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 404, description = "Task not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Work Items"
)]
pub async fn delete_task(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let affected = sqlx::query(
        "UPDATE tasks SET is_deleted = 1, updated_at = CURRENT_TIMESTAMP \
         WHERE id = ? AND is_deleted = 0",
    )
    .bind(path.into_inner())
    .execute(pool.get_ref())
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(ApiError::not_found("Task not found"));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Deleted" })))
}
