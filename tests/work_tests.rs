mod common;

use actix_web::test;
use common::*;
use serde_json::{Value, json};

#[actix_web::test]
async fn break_defaults_to_plain_break() {
    let app = init_app(test_pool().await).await;
    let token = signup(&app, "worker@example.com", &[]).await;

    let resp = test::call_service(
        &app,
        bearer(post("/work/breaks"), &token)
            .set_json(json!({ "start_time": "2026-08-26T12:00:00Z" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let brk: Value = test::read_body_json(resp).await;
    assert_eq!(brk["type"], "break");
    assert!(brk["end_time"].is_null());
}

#[actix_web::test]
async fn break_type_is_validated_on_create_and_update() {
    let app = init_app(test_pool().await).await;
    let token = signup(&app, "worker@example.com", &[]).await;

    let resp = test::call_service(
        &app,
        bearer(post("/work/breaks"), &token)
            .set_json(json!({ "start_time": "2026-08-26T12:00:00Z", "type": "siesta" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = test::call_service(
        &app,
        bearer(post("/work/breaks"), &token)
            .set_json(json!({ "start_time": "2026-08-26T12:00:00Z", "type": "lunch" }))
            .to_request(),
    )
    .await;
    let brk: Value = test::read_body_json(resp).await;
    let id = brk["id"].as_i64().unwrap();

    let resp = test::call_service(
        &app,
        bearer(put(&format!("/work/breaks/{id}")), &token)
            .set_json(json!({ "type": "siesta" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = test::call_service(
        &app,
        bearer(put(&format!("/work/breaks/{id}")), &token)
            .set_json(json!({ "type": "personal", "end_time": "2026-08-26T12:30:00Z" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let brk: Value = test::read_body_json(resp).await;
    assert_eq!(brk["type"], "personal");
    assert!(brk["end_time"].as_str().is_some());
}

#[actix_web::test]
async fn deleted_break_disappears_from_lists() {
    let app = init_app(test_pool().await).await;
    let token = signup(&app, "worker@example.com", &[]).await;

    let resp = test::call_service(
        &app,
        bearer(post("/work/breaks"), &token)
            .set_json(json!({ "start_time": "2026-08-26T09:30:00Z" }))
            .to_request(),
    )
    .await;
    let brk: Value = test::read_body_json(resp).await;
    let id = brk["id"].as_i64().unwrap();

    let resp = test::call_service(
        &app,
        bearer(delete(&format!("/work/breaks/{id}")), &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(
        &app,
        bearer(delete(&format!("/work/breaks/{id}")), &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);

    let resp = test::call_service(&app, bearer(get("/work/breaks"), &token).to_request()).await;
    let list: Vec<Value> = test::read_body_json(resp).await;
    assert!(list.is_empty());
}

#[actix_web::test]
async fn schedule_day_of_week_is_bounded() {
    let app = init_app(test_pool().await).await;
    let token = signup(&app, "worker@example.com", &[]).await;

    let resp = test::call_service(
        &app,
        bearer(post("/work/schedules"), &token)
            .set_json(json!({
                "day_of_week": 7,
                "start_time": "09:00:00",
                "end_time": "17:00:00",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = test::call_service(
        &app,
        bearer(post("/work/schedules"), &token)
            .set_json(json!({
                "day_of_week": 0,
                "start_time": "09:00:00",
                "end_time": "17:00:00",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let schedule: Value = test::read_body_json(resp).await;
    let id = schedule["id"].as_i64().unwrap();

    // The bound also holds on update
    let resp = test::call_service(
        &app,
        bearer(put(&format!("/work/schedules/{id}")), &token)
            .set_json(json!({ "day_of_week": -1 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = test::call_service(
        &app,
        bearer(put(&format!("/work/schedules/{id}")), &token)
            .set_json(json!({ "day_of_week": 4 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let schedule: Value = test::read_body_json(resp).await;
    assert_eq!(schedule["day_of_week"], 4);
}

#[actix_web::test]
async fn schedules_are_scoped_to_the_caller() {
    let app = init_app(test_pool().await).await;
    let worker = signup(&app, "worker@example.com", &[]).await;
    let other = signup(&app, "other@example.com", &[]).await;

    let resp = test::call_service(
        &app,
        bearer(post("/work/schedules"), &worker)
            .set_json(json!({
                "day_of_week": 2,
                "start_time": "08:00:00",
                "end_time": "16:00:00",
            }))
            .to_request(),
    )
    .await;
    let schedule: Value = test::read_body_json(resp).await;
    let id = schedule["id"].as_i64().unwrap();

    let resp = test::call_service(
        &app,
        bearer(delete(&format!("/work/schedules/{id}")), &other).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);

    let resp = test::call_service(&app, bearer(get("/work/schedules"), &worker).to_request()).await;
    let list: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(list.len(), 1);
}
