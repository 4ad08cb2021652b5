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
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn create_then_list_round_trip() {
    let (app, _pool, _dir) = setup_app();

    let (status, created) = request(
        &app,
        "POST",
        "/clients",
        Some(json!({"id": "c1", "name": "Acme"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], "c1");
    assert_eq!(created["name"], "Acme");
    assert_eq!(created["email"], Value::Null);
    assert_eq!(created["phone"], Value::Null);
    assert_eq!(created["company"], Value::Null);
    assert!(created["createdAt"].is_string());

    let (status, listed) = request(&app, "GET", "/clients", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().expect("list body should be an array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], "c1");
    assert_eq!(listed[0]["name"], "Acme");
    assert_eq!(listed[0]["email"], Value::Null);
    assert_eq!(listed[0]["phone"], Value::Null);
    assert_eq!(listed[0]["company"], Value::Null);
}

#[tokio::test]
async fn list_orders_newest_first() {
    let (app, pool, _dir) = setup_app();

    for (id, name) in [("c1", "First"), ("c2", "Second"), ("c3", "Third")] {
        let (status, _) = request(
            &app,
            "POST",
            "/clients",
            Some(json!({"id": id, "name": name})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Pin distinct timestamps so the ordering assertion cannot tie.
    {
        let conn = pool.get().unwrap();
        conn.execute_batch(
            "UPDATE clients SET created_at = '2025-01-01T00:00:00.000' WHERE id = 'c2';
             UPDATE clients SET created_at = '2025-03-01T00:00:00.000' WHERE id = 'c1';
             UPDATE clients SET created_at = '2025-06-01T00:00:00.000' WHERE id = 'c3';",
        )
        .unwrap();
    }

    let (_, listed) = request(&app, "GET", "/clients", None).await;
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["c3", "c1", "c2"]);
}

#[tokio::test]
async fn api_prefix_is_an_alias() {
    let (app, _pool, _dir) = setup_app();

    let (status, _) = request(
        &app,
        "POST",
        "/api/clients",
        Some(json!({"id": "c1", "name": "Acme"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, via_api) = request(&app, "GET", "/api/clients", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, bare) = request(&app, "GET", "/clients", None).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(via_api, bare, "both prefixes see the same data");
    assert_eq!(via_api.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_replaces_all_mutable_fields() {
    let (app, _pool, _dir) = setup_app();

    request(
        &app,
        "POST",
        "/clients",
        Some(json!({"id": "c1", "name": "Acme", "email": "old@acme.test"})),
    )
    .await;

    let (status, updated) = request(
        &app,
        "PUT",
        "/clients/c1",
        Some(json!({"name": "Acme Ltd", "company": "Acme Holdings"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Acme Ltd");
    assert_eq!(updated["company"], "Acme Holdings");
    assert_eq!(
        updated["email"],
        Value::Null,
        "optionals absent from the update overwrite with null"
    );
}

#[tokio::test]
async fn update_unknown_id_yields_null_body() {
    let (app, _pool, _dir) = setup_app();

    let (status, body) = request(
        &app,
        "PUT",
        "/clients/ghost",
        Some(json!({"name": "Nobody"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (app, _pool, _dir) = setup_app();

    request(
        &app,
        "POST",
        "/clients",
        Some(json!({"id": "c1", "name": "Acme"})),
    )
    .await;

    let (status, body) = request(&app, "DELETE", "/clients/c1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = request(&app, "DELETE", "/clients/c1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT, "second delete also succeeds");

    let (status, _) = request(&app, "DELETE", "/clients/never-existed", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn duplicate_id_is_a_conflict() {
    let (app, _pool, _dir) = setup_app();

    let (status, _) = request(
        &app,
        "POST",
        "/clients",
        Some(json!({"id": "c1", "name": "Acme"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = request(
        &app,
        "POST",
        "/clients",
        Some(json!({"id": "c1", "name": "Copycat"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn missing_required_field_is_a_client_error() {
    let (app, _pool, _dir) = setup_app();

    let (status, _) = request(&app, "POST", "/clients", Some(json!({"id": "c1"}))).await;
    assert!(
        status.is_client_error(),
        "a create without name must be rejected, got {status}"
    );

    let (status, listed) = request(&app, "GET", "/clients", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed.as_array().unwrap().is_empty());
}
