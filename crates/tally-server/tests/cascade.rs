//! End-to-end checks that the store's cascade rules, not application code,
//! clean up dependents.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tally_db::{create_pool, init_schema, DbPool, PoolSettings};
use tally_server::{app, AppState};
use tower::ServiceExt;

fn setup_app() -> (Router, DbPool, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let db_path = dir.path().join("tally.db");
    let pool = create_pool(db_path.to_str().unwrap(), PoolSettings::default()).unwrap();
    {
        let conn = pool.get().unwrap();
        init_schema(&conn).unwrap();
    }

    let state = AppState { pool: pool.clone() };
    (app(state), pool, dir)
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri).method(method);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn count(app: &Router, uri: &str) -> usize {
    let (status, listed) = request(app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    listed.as_array().unwrap().len()
}

/// Seeds one client with two projects, each carrying one payment.
async fn seed_tree(app: &Router) {
    for (uri, body) in [
        ("/clients", json!({"id": "c1", "name": "Acme"})),
        (
            "/projects",
            json!({"id": "p1", "clientId": "c1", "title": "Website", "deadline": "2025-01-01"}),
        ),
        (
            "/projects",
            json!({"id": "p2", "clientId": "c1", "title": "Logo", "deadline": "2025-03-01"}),
        ),
        (
            "/payments",
            json!({"id": "m1", "projectId": "p1", "amount": 250.0, "dueDate": "2025-02-01"}),
        ),
        (
            "/payments",
            json!({"id": "m2", "projectId": "p2", "amount": 400.0, "dueDate": "2025-04-01"}),
        ),
    ] {
        let (status, _) = request(app, "POST", uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn deleting_a_client_clears_projects_and_payments() {
    let (app, _pool, _dir) = setup_app();
    seed_tree(&app).await;

    assert_eq!(count(&app, "/projects").await, 2);
    assert_eq!(count(&app, "/payments").await, 2);

    let (status, _) = request(&app, "DELETE", "/clients/c1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(count(&app, "/clients").await, 0);
    assert_eq!(count(&app, "/projects").await, 0, "projects cascade away");
    assert_eq!(
        count(&app, "/payments").await,
        0,
        "payments cascade transitively"
    );
}

#[tokio::test]
async fn deleting_a_project_clears_only_its_payments() {
    let (app, _pool, _dir) = setup_app();
    seed_tree(&app).await;

    let (status, _) = request(&app, "DELETE", "/projects/p1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, payments) = request(&app, "GET", "/payments", None).await;
    let ids: Vec<&str> = payments
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["m2"], "only the deleted project's payment goes");

    assert_eq!(count(&app, "/projects").await, 1);
    assert_eq!(count(&app, "/clients").await, 1, "the client is untouched");
}
