use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use configs::DatabaseConfig;

async fn build_app() -> anyhow::Result<Router> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let db = models::db::connect_with_config(&cfg).await?;
    models::db::migrate(&db).await?;
    Ok(server::build_app(db))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&v)?)
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body)?).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, json))
}

async fn register(app: &Router, username: &str) -> anyhow::Result<()> {
    let (status, _) = send(app, "POST", "/users", Some(json!({"username": username, "password": "Secret123"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(())
}

fn listing() -> Value {
    json!({"address": "123 Main St", "price": 250000, "size": 1200, "description": "A beautiful property"})
}

#[tokio::test]
async fn create_get_and_list() -> anyhow::Result<()> {
    let app = build_app().await?;
    register(&app, "alice").await?;

    let (status, created) = send(&app, "POST", "/properties?username=alice", Some(listing())).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["address"], "123 Main St");
    assert_eq!(created["owner"], "alice");
    let id = created["id"].as_i64().unwrap();

    let (status, found) = send(&app, "GET", &format!("/properties/{id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, created);

    let (status, all) = send(&app, "GET", "/properties", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, json!([created]));
    Ok(())
}

#[tokio::test]
async fn create_for_unknown_user_is_bad_request() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, body) = send(&app, "POST", "/properties?username=ghost", Some(listing())).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (_, all) = send(&app, "GET", "/properties", None).await?;
    assert_eq!(all, json!([]));
    Ok(())
}

#[tokio::test]
async fn invalid_fields_are_reported() -> anyhow::Result<()> {
    let app = build_app().await?;
    register(&app, "alice").await?;

    let bad = json!({"address": "", "price": 0, "size": 1200, "description": "x"});
    let (status, body) = send(&app, "POST", "/properties?username=alice", Some(bad)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let messages: Vec<&str> = body["violations"].as_array().unwrap().iter().map(|v| v["message"].as_str().unwrap()).collect();
    assert_eq!(messages, vec!["Address is required", "Price must be greater than 0"]);
    Ok(())
}

#[tokio::test]
async fn client_supplied_owner_is_ignored() -> anyhow::Result<()> {
    let app = build_app().await?;
    register(&app, "alice").await?;
    register(&app, "bob").await?;

    let mut body = listing();
    body["owner"] = json!("bob");
    body["id"] = json!(4242);
    let (status, created) = send(&app, "POST", "/properties?username=alice", Some(body)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["owner"], "alice");
    assert_ne!(created["id"], 4242);
    Ok(())
}

#[tokio::test]
async fn only_owner_can_update_or_delete() -> anyhow::Result<()> {
    let app = build_app().await?;
    register(&app, "alice").await?;
    register(&app, "bob").await?;
    let (_, created) = send(&app, "POST", "/properties?username=alice", Some(listing())).await?;
    let uri = format!("/properties/{}", created["id"]);

    let change = json!({"address": "456 Oak Ave", "price": 300000, "size": 1500, "description": "Renovated"});
    let (status, _) = send(&app, "PUT", &format!("{uri}?username=bob"), Some(change.clone())).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "DELETE", &format!("{uri}?username=bob"), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = send(&app, "PUT", &format!("{uri}?username=alice"), Some(change)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["address"], "456 Oak Ave");
    assert_eq!(updated["owner"], "alice");

    let (status, body) = send(&app, "DELETE", &format!("{uri}?username=alice"), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    let (status, _) = send(&app, "GET", &uri, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn missing_property_is_not_found() -> anyhow::Result<()> {
    let app = build_app().await?;
    register(&app, "alice").await?;

    let (status, body) = send(&app, "GET", "/properties/999", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    let (status, _) = send(&app, "PUT", "/properties/999?username=alice", Some(listing())).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", "/properties/999?username=alice", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // update never creates the id it was given
    let (_, all) = send(&app, "GET", "/properties", None).await?;
    assert_eq!(all, json!([]));
    Ok(())
}

#[tokio::test]
async fn health_and_docs_are_served() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/properties/{id}"].is_object());
    Ok(())
}

#[tokio::test]
async fn malformed_requests_get_json_errors() -> anyhow::Result<()> {
    let app = build_app().await?;
    register(&app, "alice").await?;

    let (status, body) = send(&app, "POST", "/properties", Some(listing())).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, body) = send(&app, "GET", "/properties/abc", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, body) = send(&app, "POST", "/properties?username=alice", Some(json!({"address": "1 Main St"}))).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);

    let req = Request::builder()
        .method("POST")
        .uri("/properties?username=alice")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await?)?;
    assert_eq!(body["error"], "Bad Request");
    Ok(())
}

#[tokio::test]
async fn overlong_address_is_a_field_error() -> anyhow::Result<()> {
    let app = build_app().await?;
    register(&app, "alice").await?;

    let mut body = listing();
    body["address"] = json!("A".repeat(256));
    let (status, err) = send(&app, "POST", "/properties?username=alice", Some(body)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["violations"][0]["field"], "address");
    assert_eq!(err["violations"][0]["message"], "Address can't be longer than 255 characters");
    Ok(())
}
