#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse};
use actix_web::middleware::{NormalizePath, Next, from_fn};
use actix_web::{App, Error, HttpResponse, test, web};
use employee_system::config::Config;
use employee_system::db::run_migrations;
use employee_system::routes;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

pub const PASSWORD: &str = "s3cret-password";

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        access_token_ttl: 3600,
        refresh_token_ttl: 7200,
        // High limits so the governor never interferes with tests
        rate_login_per_min: 1000,
        rate_register_per_min: 1000,
        rate_refresh_per_min: 1000,
        rate_protected_per_min: 1000,
        api_prefix: "".to_string(),
    }
}

/// Single-connection pool so every query sees the same in-memory database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");
    run_migrations(&pool).await.expect("run migrations");
    pool
}

/// Render middleware errors into HTTP responses the way the real server does,
/// so `call_service` sees a status code instead of panicking on `Err`.
async fn render_errors(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    match next.call(req).await {
        Ok(res) => Ok(res.map_into_boxed_body()),
        Err(err) => {
            let http_req = test::TestRequest::default().to_http_request();
            Ok(ServiceResponse::new(http_req, HttpResponse::from_error(err)))
        }
    }
}

pub async fn init_app(
    pool: SqlitePool,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    let config = test_config();
    let route_config = config.clone();
    test::init_service(
        App::new()
            .wrap(from_fn(render_errors))
            .wrap(NormalizePath::trim())
            .app_data(web::Data::new(pool))
            .app_data(web::Data::new(config))
            .configure(move |cfg| routes::configure(cfg, route_config)),
    )
    .await
}

// The rate limiter keys on peer IP, so every test request needs one.
fn request(method: test::TestRequest, path: &str) -> test::TestRequest {
    method
        .uri(path)
        .peer_addr("127.0.0.1:34567".parse().unwrap())
}

pub fn get(path: &str) -> test::TestRequest {
    request(test::TestRequest::get(), path)
}

pub fn post(path: &str) -> test::TestRequest {
    request(test::TestRequest::post(), path)
}

pub fn put(path: &str) -> test::TestRequest {
    request(test::TestRequest::put(), path)
}

pub fn delete(path: &str) -> test::TestRequest {
    request(test::TestRequest::delete(), path)
}

pub fn bearer(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header(("Authorization", format!("Bearer {token}")))
}

/// Register a user with the given roles and return its public record.
pub async fn register_user<S, B>(app: &S, email: &str, roles: &[&str]) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = test::call_service(
        app,
        post("/auth/register")
            .set_json(json!({
                "email": email,
                "password": PASSWORD,
                "roles": roles,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201, "registration of {email} should succeed");
    test::read_body_json(resp).await
}

/// Login and return the access token.
pub async fn login_token<S, B>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let body = login_response(app, email).await;
    body["access_token"].as_str().expect("access_token").to_string()
}

/// Login and return the full token response body.
pub async fn login_response<S, B>(app: &S, email: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = test::call_service(
        app,
        post("/auth/login")
            .set_json(json!({ "email": email, "password": PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200, "login of {email} should succeed");
    test::read_body_json(resp).await
}

/// Register + login in one step; returns the access token.
pub async fn signup<S, B>(app: &S, email: &str, roles: &[&str]) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    register_user(app, email, roles).await;
    login_token(app, email).await
}
