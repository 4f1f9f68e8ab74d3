use crate::{
    auth::{
        auth::AuthUser,
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::{DUMMY_HASH, hash_password, verify_password},
    },
    config::Config,
    error::{ApiError, conflict_on_unique},
    model::{
        role,
        user::{PublicUser, User},
    },
    models::TokenType,
};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::BTreeSet;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    /// Role names to assign; every name must exist in the role registry.
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: PublicUser,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Register a new user with optional roles.
///
/// Registration is atomic: the user row and its role assignments commit in
/// one transaction, and a single unknown role name fails the whole request.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = PublicUser),
        (status = 400, description = "Validation failure"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    pool: web::Data<SqlitePool>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let email = normalize_email(&payload.email);

    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation(
            "Email and password must not be empty",
        ));
    }

    let taken = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
        .bind(&email)
        .fetch_one(pool.get_ref())
        .await?;
    if taken {
        return Err(ApiError::conflict("Email already registered"));
    }

    // Resolve requested role names before touching the users table.
    let requested: BTreeSet<String> = payload.roles.iter().cloned().collect();
    let mut role_ids = Vec::with_capacity(requested.len());
    if !requested.is_empty() {
        let placeholders = vec!["?"; requested.len()].join(", ");
        let sql = format!(
            "SELECT id FROM roles WHERE is_deleted = 0 AND name IN ({placeholders})"
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for name in &requested {
            query = query.bind(name);
        }
        role_ids = query.fetch_all(pool.get_ref()).await?;
        if role_ids.len() != requested.len() {
            return Err(ApiError::validation("One or more roles do not exist"));
        }
    }

    let hashed = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        ApiError::Internal
    })?;

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO users (email, password_hash, first_name, last_name, phone)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&email)
    .bind(&hashed)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.phone)
    .execute(&mut *tx)
    .await
    .map_err(|e| conflict_on_unique(e, "Email already registered"))?;

    let user_id = result.last_insert_rowid();

    for role_id in &role_ids {
        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(role_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    info!(user_id, "User registered");

    let user = User::find_by_id(pool.get_ref(), user_id)
        .await?
        .ok_or(ApiError::Internal)?;
    let roles = role::role_names_for_user(pool.get_ref(), user_id).await?;

    Ok(HttpResponse::Created().json(user.into_public(roles)))
}

/// Login with email and password; returns access + refresh tokens.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials or inactive account")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(pool, config, payload))]
pub async fn login(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let email = normalize_email(&payload.email);

    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation(
            "Email and password must not be empty",
        ));
    }

    debug!("Fetching user from database");

    let user = match User::find_by_email(pool.get_ref(), &email).await? {
        Some(user) => user,
        None => {
            // Burn a verification anyway so the timing matches the
            // wrong-password path.
            let _ = verify_password(&payload.password, &DUMMY_HASH);
            info!("Invalid credentials: user not found");
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
    };

    if verify_password(&payload.password, &user.password_hash).is_err() {
        info!(user_id = user.id, "Invalid credentials: password mismatch");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    if !user.is_active {
        info!(user_id = user.id, "Login rejected: inactive account");
        return Err(ApiError::unauthorized("User inactive"));
    }

    // Non-fatal: a failed stamp never fails the login.
    if let Err(e) = sqlx::query("UPDATE users SET last_login_at = CURRENT_TIMESTAMP WHERE id = ?")
        .bind(user.id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, user_id = user.id, "Failed to update last_login_at");
    }

    let roles = role::role_names_for_user(pool.get_ref(), user.id).await?;

    let access_token = generate_access_token(
        user.id,
        roles.clone(),
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| {
        error!(error = %e, "Failed to sign access token");
        ApiError::Internal
    })?;

    let refresh_token =
        generate_refresh_token(user.id, &config.jwt_secret, config.refresh_token_ttl).map_err(
            |e| {
                error!(error = %e, "Failed to sign refresh token");
                ApiError::Internal
            },
        )?;

    let user = User::find_by_id(pool.get_ref(), user.id)
        .await?
        .ok_or(ApiError::Internal)?;

    info!(user_id = user.id, "Login successful");

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token,
        refresh_token: Some(refresh_token),
        user: user.into_public(roles),
    }))
}

/// Exchange a refresh token for a fresh access token.
///
/// Role claims are re-derived from the live role registry, not copied from
/// the refresh token.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "Access token refreshed", body = TokenResponse),
        (status = 401, description = "Missing, invalid, or non-refresh token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn refresh(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let claims = verify_token(token, &config.jwt_secret)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

    if claims.token_type != TokenType::Refresh {
        return Err(ApiError::unauthorized("Refresh token required"));
    }

    let user = User::find_by_id(pool.get_ref(), claims.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid user"))?;
    if !user.is_active {
        return Err(ApiError::unauthorized("User inactive"));
    }

    let roles = role::role_names_for_user(pool.get_ref(), user.id).await?;

    let access_token = generate_access_token(
        user.id,
        roles.clone(),
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| {
        error!(error = %e, "Failed to sign access token");
        ApiError::Internal
    })?;

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token,
        refresh_token: None,
        user: user.into_public(roles),
    }))
}

/// Current user profile.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = PublicUser),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(auth: AuthUser, pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let user = User::find_by_id(pool.get_ref(), auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let roles = role::role_names_for_user(pool.get_ref(), user.id).await?;

    Ok(HttpResponse::Ok().json(user.into_public(roles)))
}
