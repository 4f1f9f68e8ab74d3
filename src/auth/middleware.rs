use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::role;
use crate::models::TokenType;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    error::ErrorInternalServerError,
    web::Data,
};
use sqlx::SqlitePool;

/// Authorization guard for the protected scope: verifies the bearer token,
/// then re-checks the live user row and role set so that deactivations and
/// role changes take effect without waiting for the token to expire.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| ErrorInternalServerError("App config missing"))?
        .clone();
    let pool = req
        .app_data::<Data<SqlitePool>>()
        .ok_or_else(|| ErrorInternalServerError("Database pool missing"))?
        .clone();

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let claims = verify_token(token, &config.jwt_secret)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

    if claims.token_type != TokenType::Access {
        return Err(ApiError::unauthorized("Access token required").into());
    }

    // Live lookup: token claims alone do not authorize anything.
    let user = sqlx::query_as::<_, (i64, String, bool)>(
        "SELECT id, email, is_active FROM users WHERE id = ? AND is_deleted = 0",
    )
    .bind(claims.user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(ApiError::from)?;

    let (user_id, email, is_active) = match user {
        Some(row) => row,
        None => return Err(ApiError::unauthorized("Invalid or inactive user").into()),
    };
    if !is_active {
        return Err(ApiError::unauthorized("Invalid or inactive user").into());
    }

    let roles = role::role_names_for_user(pool.get_ref(), user_id)
        .await
        .map_err(ApiError::from)?;

    req.extensions_mut().insert(AuthUser {
        user_id,
        email,
        roles,
    });

    next.call(req).await
}
