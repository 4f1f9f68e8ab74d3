mod common;

use actix_web::test;
use common::*;
use serde_json::{Value, json};

#[actix_web::test]
async fn role_registry_is_super_admin_only() {
    let app = init_app(test_pool().await).await;
    let worker = signup(&app, "worker@example.com", &["employee"]).await;
    let manager = signup(&app, "manager@example.com", &["manager"]).await;

    for token in [&worker, &manager] {
        let resp = test::call_service(&app, bearer(get("/roles"), token).to_request()).await;
        assert_eq!(resp.status(), 403);
    }
}

#[actix_web::test]
async fn default_roles_are_seeded() {
    let app = init_app(test_pool().await).await;
    let admin = signup(&app, "admin@example.com", &["super_admin"]).await;

    let resp = test::call_service(&app, bearer(get("/roles"), &admin).to_request()).await;
    assert_eq!(resp.status(), 200);
    let roles: Vec<Value> = test::read_body_json(resp).await;
    let names: Vec<&str> = roles.iter().filter_map(|r| r["name"].as_str()).collect();
    for expected in ["super_admin", "manager", "team_lead", "employee"] {
        assert!(names.contains(&expected), "{expected} should be seeded");
    }
}

#[actix_web::test]
async fn role_crud_round_trip() {
    let app = init_app(test_pool().await).await;
    let admin = signup(&app, "admin@example.com", &["super_admin"]).await;

    let resp = test::call_service(
        &app,
        bearer(post("/roles"), &admin)
            .set_json(json!({ "name": "contractor", "description": "External staff" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let role: Value = test::read_body_json(resp).await;
    let id = role["id"].as_i64().unwrap();

    // Duplicate name
    let resp = test::call_service(
        &app,
        bearer(post("/roles"), &admin)
            .set_json(json!({ "name": "contractor" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 409);

    let resp = test::call_service(
        &app,
        bearer(put(&format!("/roles/{id}")), &admin)
            .set_json(json!({ "description": "External contractors" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let role: Value = test::read_body_json(resp).await;
    assert_eq!(role["description"], "External contractors");

    let resp = test::call_service(
        &app,
        bearer(delete(&format!("/roles/{id}")), &admin).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(
        &app,
        bearer(get(&format!("/roles/{id}")), &admin).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn deleted_role_cannot_be_assigned() {
    let app = init_app(test_pool().await).await;
    let admin = signup(&app, "admin@example.com", &["super_admin"]).await;

    let resp = test::call_service(
        &app,
        bearer(post("/roles"), &admin)
            .set_json(json!({ "name": "temp" }))
            .to_request(),
    )
    .await;
    let role: Value = test::read_body_json(resp).await;
    let id = role["id"].as_i64().unwrap();

    test::call_service(
        &app,
        bearer(delete(&format!("/roles/{id}")), &admin).to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        post("/auth/register")
            .set_json(json!({
                "email": "late@example.com",
                "password": PASSWORD,
                "roles": ["temp"],
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
}
