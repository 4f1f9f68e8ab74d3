mod common;

use actix_web::test;
use common::*;
use serde_json::{Value, json};

#[actix_web::test]
async fn projects_are_shared_between_users() {
    let app = init_app(test_pool().await).await;
    let creator = signup(&app, "creator@example.com", &[]).await;
    let other = signup(&app, "other@example.com", &[]).await;

    let resp = test::call_service(
        &app,
        bearer(post("/workitems/projects"), &creator)
            .set_json(json!({ "name": "Website relaunch", "start_date": "2026-09-01" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let project: Value = test::read_body_json(resp).await;
    let id = project["id"].as_i64().unwrap();

    // Visible and editable by everyone
    let resp = test::call_service(
        &app,
        bearer(get(&format!("/workitems/projects/{id}")), &other).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(
        &app,
        bearer(put(&format!("/workitems/projects/{id}")), &other)
            .set_json(json!({ "description": "Q4 initiative" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["description"], "Q4 initiative");
}

#[actix_web::test]
async fn project_owner_defaults_to_caller_but_can_be_named() {
    let app = init_app(test_pool().await).await;
    let creator = signup(&app, "creator@example.com", &[]).await;
    let other = signup(&app, "other@example.com", &[]).await;
    let creator_me: Value = test::read_body_json(
        test::call_service(&app, bearer(get("/auth/me"), &creator).to_request()).await,
    )
    .await;
    let other_me: Value = test::read_body_json(
        test::call_service(&app, bearer(get("/auth/me"), &other).to_request()).await,
    )
    .await;

    let resp = test::call_service(
        &app,
        bearer(post("/workitems/projects"), &creator)
            .set_json(json!({ "name": "Mine" }))
            .to_request(),
    )
    .await;
    let project: Value = test::read_body_json(resp).await;
    assert_eq!(project["owner_id"], creator_me["id"]);

    let resp = test::call_service(
        &app,
        bearer(post("/workitems/projects"), &creator)
            .set_json(json!({ "name": "Handed over", "owner_id": other_me["id"] }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let project: Value = test::read_body_json(resp).await;
    assert_eq!(project["owner_id"], other_me["id"]);
}

#[actix_web::test]
async fn task_defaults_and_validation() {
    let app = init_app(test_pool().await).await;
    let token = signup(&app, "worker@example.com", &[]).await;

    let resp = test::call_service(
        &app,
        bearer(post("/workitems/tasks"), &token)
            .set_json(json!({ "title": "Write docs" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let task: Value = test::read_body_json(resp).await;
    assert_eq!(task["status"], "todo");
    assert_eq!(task["priority"], "medium");
    assert!(task["project_id"].is_null());

    let resp = test::call_service(
        &app,
        bearer(post("/workitems/tasks"), &token)
            .set_json(json!({ "title": "Bad", "status": "started" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = test::call_service(
        &app,
        bearer(post("/workitems/tasks"), &token)
            .set_json(json!({ "title": "Bad", "priority": "asap" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn task_requires_a_live_project_when_linked() {
    let app = init_app(test_pool().await).await;
    let token = signup(&app, "worker@example.com", &[]).await;

    let resp = test::call_service(
        &app,
        bearer(post("/workitems/tasks"), &token)
            .set_json(json!({ "title": "Orphan", "project_id": 4242 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Project not found");
}

#[actix_web::test]
async fn task_status_transitions_via_update() {
    let app = init_app(test_pool().await).await;
    let token = signup(&app, "worker@example.com", &[]).await;

    let resp = test::call_service(
        &app,
        bearer(post("/workitems/tasks"), &token)
            .set_json(json!({ "title": "Ship it", "priority": "high" }))
            .to_request(),
    )
    .await;
    let task: Value = test::read_body_json(resp).await;
    let id = task["id"].as_i64().unwrap();

    let resp = test::call_service(
        &app,
        bearer(put(&format!("/workitems/tasks/{id}")), &token)
            .set_json(json!({ "status": "in_progress" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let task: Value = test::read_body_json(resp).await;
    assert_eq!(task["status"], "in_progress");

    let resp = test::call_service(
        &app,
        bearer(put(&format!("/workitems/tasks/{id}")), &token)
            .set_json(json!({ "status": "shipped" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn soft_deleted_items_vanish() {
    let app = init_app(test_pool().await).await;
    let token = signup(&app, "worker@example.com", &[]).await;

    let resp = test::call_service(
        &app,
        bearer(post("/workitems/projects"), &token)
            .set_json(json!({ "name": "Short-lived" }))
            .to_request(),
    )
    .await;
    let project: Value = test::read_body_json(resp).await;
    let id = project["id"].as_i64().unwrap();

    let resp = test::call_service(
        &app,
        bearer(delete(&format!("/workitems/projects/{id}")), &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(
        &app,
        bearer(get(&format!("/workitems/projects/{id}")), &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);

    let resp =
        test::call_service(&app, bearer(get("/workitems/projects"), &token).to_request()).await;
    let list: Vec<Value> = test::read_body_json(resp).await;
    assert!(list.is_empty());
}
