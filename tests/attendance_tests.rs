mod common;

use actix_web::test;
use common::*;
use serde_json::{Value, json};

#[actix_web::test]
async fn check_in_defaults_date_and_time() {
    let app = init_app(test_pool().await).await;
    let token = signup(&app, "worker@example.com", &[]).await;

    let resp = test::call_service(
        &app,
        bearer(post("/attendance"), &token)
            .set_json(json!({ "method": "manual" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let record: Value = test::read_body_json(resp).await;
    assert_eq!(record["method"], "manual");
    assert!(record["date"].as_str().is_some());
    assert!(record["check_in_time"].as_str().is_some());
    assert!(record["check_out_time"].is_null());
}

#[actix_web::test]
async fn check_in_rejects_unknown_method() {
    let app = init_app(test_pool().await).await;
    let token = signup(&app, "worker@example.com", &[]).await;

    let resp = test::call_service(
        &app,
        bearer(post("/attendance"), &token)
            .set_json(json!({ "method": "telepathy" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid method. Allowed: manual, gps, face");

    // Nothing was persisted
    let resp = test::call_service(&app, bearer(get("/attendance"), &token).to_request()).await;
    let list: Vec<Value> = test::read_body_json(resp).await;
    assert!(list.is_empty());
}

#[actix_web::test]
async fn checkout_happens_exactly_once() {
    let app = init_app(test_pool().await).await;
    let token = signup(&app, "worker@example.com", &[]).await;

    let resp = test::call_service(
        &app,
        bearer(post("/attendance"), &token)
            .set_json(json!({ "method": "gps", "latitude": 52.52, "longitude": 13.405 }))
            .to_request(),
    )
    .await;
    let record: Value = test::read_body_json(resp).await;
    let id = record["id"].as_i64().unwrap();

    let resp = test::call_service(
        &app,
        bearer(post(&format!("/attendance/{id}/checkout")), &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let record: Value = test::read_body_json(resp).await;
    assert!(record["check_out_time"].as_str().is_some());

    let resp = test::call_service(
        &app,
        bearer(post(&format!("/attendance/{id}/checkout")), &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Already checked out");
}

#[actix_web::test]
async fn attendance_is_scoped_to_the_caller() {
    let app = init_app(test_pool().await).await;
    let worker = signup(&app, "worker@example.com", &[]).await;
    let other = signup(&app, "other@example.com", &[]).await;

    let resp = test::call_service(
        &app,
        bearer(post("/attendance"), &worker)
            .set_json(json!({ "method": "face", "face_ref": "scan-1" }))
            .to_request(),
    )
    .await;
    let record: Value = test::read_body_json(resp).await;
    let id = record["id"].as_i64().unwrap();

    // Checking out someone else's record looks like a missing record
    let resp = test::call_service(
        &app,
        bearer(post(&format!("/attendance/{id}/checkout")), &other).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);

    let resp = test::call_service(&app, bearer(get("/attendance"), &other).to_request()).await;
    let list: Vec<Value> = test::read_body_json(resp).await;
    assert!(list.is_empty());
}
