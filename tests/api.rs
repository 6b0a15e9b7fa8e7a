//! Integration tests for the HTTP API against an in-memory store.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use jobtrack::api;
use jobtrack_core::{Store, Tracker};

fn server() -> TestServer {
    let store = Store::in_memory().expect("in-memory store");
    TestServer::new(api::create_router(Tracker::new(store))).expect("test server")
}

async fn create(server: &TestServer, company: &str, status: &str) -> String {
    let response = server
        .post("/api/applications")
        .json(&json!({
            "company": company,
            "position": "Engineer",
            "status": status,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_and_list_applications() {
    let server = server();
    let id = create(&server, "Acme", "applied").await;
    assert_eq!(id.len(), 8);

    let response = server.get("/api/applications").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let apps = response.json::<Vec<Value>>();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0]["company"], "Acme");
    assert_eq!(apps[0]["status"], "applied");
}

#[tokio::test]
async fn create_rejects_blank_company() {
    let server = server();
    let response = server
        .post("/api/applications")
        .json(&json!({
            "company": "   ",
            "position": "Engineer",
            "status": "applied",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json::<Value>()["error"]
        .as_str()
        .unwrap()
        .contains("company"));
}

#[tokio::test]
async fn update_logs_a_single_status_change() {
    let server = server();
    let id = create(&server, "Acme", "applied").await;

    let response = server
        .put(&format!("/api/applications/{id}"))
        .json(&json!({
            "company": "Acme",
            "position": "Engineer",
            "status": "interviewed",
            "notes": "Went well",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let history = server
        .get(&format!("/api/applications/{id}/history"))
        .await
        .json::<Vec<Value>>();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["action"], "status_update");
    assert_eq!(history[0]["detail"], "Applied -> Interviewed");
}

#[tokio::test]
async fn status_filter_and_company_filter_compose() {
    let server = server();
    create(&server, "Acme Corp", "applied").await;
    create(&server, "Acme Corp", "rejected").await;
    create(&server, "Globex", "applied").await;

    let apps = server
        .get("/api/applications?status=applied&company=acme")
        .await
        .json::<Vec<Value>>();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0]["company"], "Acme Corp");

    let response = server.get("/api/applications?status=ghosted").await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn delete_is_idempotent_and_preserves_history() {
    let server = server();
    let id = create(&server, "Acme", "applied").await;

    let first = server.delete(&format!("/api/applications/{id}")).await;
    assert_eq!(first.status_code(), StatusCode::NO_CONTENT);
    let second = server.delete(&format!("/api/applications/{id}")).await;
    assert_eq!(second.status_code(), StatusCode::NO_CONTENT);

    let history = server
        .get(&format!("/api/applications/{id}/history"))
        .await
        .json::<Vec<Value>>();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn unknown_application_is_not_found() {
    let server = server();
    let response = server.get("/api/applications/nope0000").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server
        .put("/api/applications/nope0000")
        .json(&json!({
            "company": "Acme",
            "position": "Engineer",
            "status": "applied",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_history_entry_requires_its_id() {
    let server = server();
    let id = create(&server, "Acme", "applied").await;

    let history = server
        .get(&format!("/api/applications/{id}/history"))
        .await
        .json::<Vec<Value>>();
    let history_id = history[0]["history_id"].as_str().unwrap();

    let response = server.delete(&format!("/api/history/{history_id}")).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server.delete(&format!("/api/history/{history_id}")).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_reports_summary_counts() {
    let server = server();
    create(&server, "Acme", "applied").await;
    create(&server, "Acme", "interview_pending").await;
    create(&server, "Globex", "offer_received").await;

    let body = server.get("/api/dashboard").await.json::<Value>();
    assert_eq!(body["summary"]["total"], 3);
    assert_eq!(body["summary"]["interviews_pending"], 1);
    assert_eq!(body["summary"]["offers"], 1);
    // Freshly created applications are never stale.
    assert_eq!(body["stale"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn rows_survive_reopening_the_store() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("jobtrack.db");

    {
        let store = Store::open(&path).expect("open store");
        let server = TestServer::new(api::create_router(Tracker::new(store))).unwrap();
        create(&server, "Acme", "applied").await;
    }

    let store = Store::open(&path).expect("reopen store");
    let server = TestServer::new(api::create_router(Tracker::new(store))).unwrap();
    let apps = server.get("/api/applications").await.json::<Vec<Value>>();
    assert_eq!(apps.len(), 1);
}

#[tokio::test]
async fn report_download_survives_non_ascii_fields() {
    let server = server();
    create(&server, "Şirket Ö.", "applied").await;

    let response = server.get("/api/report").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let text = response.text();
    assert!(text.contains("Sirket O. - Engineer"));

    let response = server.get("/api/report?format=compact").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Sirket O."));

    let response = server.get("/api/report?format=pdf").await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}
