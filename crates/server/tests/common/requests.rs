//! Request helpers for driving the router in tests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

/// Make a JSON request against the router.
#[allow(dead_code)]
pub async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    auth_token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = auth_token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Build a multipart body carrying a single file field.
#[allow(dead_code)]
pub fn multipart_body(field: &str, filename: &str, data: &[u8]) -> (String, Vec<u8>) {
    let boundary = "chartdeck-test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={boundary}"), body)
}

/// Upload a file through POST /upload.
#[allow(dead_code)]
pub async fn upload_request(
    router: &axum::Router,
    filename: &str,
    data: &[u8],
    auth_token: Option<&str>,
) -> (StatusCode, Value) {
    let (content_type, body) = multipart_body("excelFile", filename, data);

    let mut builder = Request::builder()
        .method("POST")
        .uri("/upload")
        .header("Content-Type", content_type);

    if let Some(token) = auth_token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = builder.body(Body::from(body)).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Register a user through the API and return (token, user_id).
#[allow(dead_code)]
pub async fn register_user(
    router: &axum::Router,
    handle: &str,
    email: &str,
    password: &str,
    admin_key: Option<&str>,
) -> (String, String) {
    let mut body = serde_json::json!({
        "handle": handle,
        "email": email,
        "password": password,
    });
    if let Some(key) = admin_key {
        body["admin_key"] = Value::String(key.to_string());
    }

    let (status, json) = json_request(router, "POST", "/auth/register", Some(body), None).await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {json}");

    let token = json["token"].as_str().expect("token missing").to_string();
    let user_id = json["user"]["id"]
        .as_str()
        .expect("user id missing")
        .to_string();
    (token, user_id)
}
