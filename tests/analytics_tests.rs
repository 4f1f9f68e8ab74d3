mod common;

use actix_web::test;
use common::*;
use serde_json::{Value, json};

#[actix_web::test]
async fn analytics_are_role_gated() {
    let app = init_app(test_pool().await).await;
    let worker = signup(&app, "worker@example.com", &["employee"]).await;

    for path in [
        "/analytics/attendance/summary",
        "/analytics/tasks/status",
        "/analytics/leaves/pending",
        "/analytics/notifications/unread",
    ] {
        let resp = test::call_service(&app, bearer(get(path), &worker).to_request()).await;
        assert_eq!(resp.status(), 403, "{path} should be role-gated");
    }
}

#[actix_web::test]
async fn counters_reflect_seeded_data() {
    let app = init_app(test_pool().await).await;
    let worker = signup(&app, "worker@example.com", &["employee"]).await;
    let manager = signup(&app, "manager@example.com", &["manager"]).await;

    // One open manual check-in, one closed gps check-in
    let resp = test::call_service(
        &app,
        bearer(post("/attendance"), &worker)
            .set_json(json!({ "method": "manual" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp = test::call_service(
        &app,
        bearer(post("/attendance"), &manager)
            .set_json(json!({ "method": "gps" }))
            .to_request(),
    )
    .await;
    let record: Value = test::read_body_json(resp).await;
    let id = record["id"].as_i64().unwrap();
    test::call_service(
        &app,
        bearer(post(&format!("/attendance/{id}/checkout")), &manager).to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        bearer(get("/analytics/attendance/summary"), &manager).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let summary: Value = test::read_body_json(resp).await;
    assert_eq!(summary["total"], 2);
    assert_eq!(summary["open"], 1);
    assert_eq!(summary["by_method"]["manual"], 1);
    assert_eq!(summary["by_method"]["gps"], 1);

    // Two tasks, one in progress
    for body in [
        json!({ "title": "A" }),
        json!({ "title": "B", "status": "in_progress" }),
    ] {
        let resp = test::call_service(
            &app,
            bearer(post("/workitems/tasks"), &worker)
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 201);
    }

    let resp = test::call_service(
        &app,
        bearer(get("/analytics/tasks/status"), &manager).to_request(),
    )
    .await;
    let tasks: Value = test::read_body_json(resp).await;
    assert_eq!(tasks["by_status"]["todo"], 1);
    assert_eq!(tasks["by_status"]["in_progress"], 1);

    // One pending leave
    let resp = test::call_service(
        &app,
        bearer(post("/leaves"), &worker)
            .set_json(json!({
                "start_date": "2026-09-01",
                "end_date": "2026-09-02",
                "type": "sick",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp = test::call_service(
        &app,
        bearer(get("/analytics/leaves/pending"), &manager).to_request(),
    )
    .await;
    let leaves: Value = test::read_body_json(resp).await;
    assert_eq!(leaves["pending"], 1);

    // One unread notification
    let worker_me: Value = test::read_body_json(
        test::call_service(&app, bearer(get("/auth/me"), &worker).to_request()).await,
    )
    .await;
    let resp = test::call_service(
        &app,
        bearer(post("/notifications"), &manager)
            .set_json(json!({
                "user_id": worker_me["id"],
                "title": "Ping",
                "message": "Pong",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp = test::call_service(
        &app,
        bearer(get("/analytics/notifications/unread"), &manager).to_request(),
    )
    .await;
    let unread: Value = test::read_body_json(resp).await;
    assert_eq!(unread["unread"], 1);
}

#[actix_web::test]
async fn health_is_public() {
    let app = init_app(test_pool().await).await;

    let resp = test::call_service(&app, get("/health").to_request()).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
}
