use crate::error::ApiError;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

/// Authenticated caller, populated by `auth_middleware` from the live user
/// row. `roles` is the current role set, not the (possibly stale) token claims.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub roles: Vec<String>,
}

impl AuthUser {
    /// Fails with `Forbidden` unless the caller's role set intersects
    /// `allowed`. An empty allow-list admits any authenticated user.
    pub fn require_any(&self, allowed: &[&str]) -> Result<(), ApiError> {
        if allowed.is_empty() || self.roles.iter().any(|r| allowed.contains(&r.as_str())) {
            Ok(())
        } else {
            Err(ApiError::forbidden("Insufficient permissions"))
        }
    }
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(ApiError::unauthorized("Missing token").into())),
        }
    }
}
