//! Integration tests for admin aggregation endpoints.

mod common;

use axum::http::StatusCode;
use common::fixtures::{sales_workbook, SALES_ROW_COUNT};
use common::requests::{json_request, register_user, upload_request};
use common::TestServer;
use serde_json::json;

const ADMIN_KEY: &str = "test-admin-key";

#[tokio::test]
async fn test_admin_endpoints_gated() {
    let server = TestServer::new().await;
    let (user_token, _) = register_user(&server.router, "u1", "u1@x.com", "p", None).await;

    for uri in ["/admin/users", "/admin/stats"] {
        // No token: 401
        let (status, _) = json_request(&server.router, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // Valid non-admin token: 403
        let (status, body) =
            json_request(&server.router, "GET", uri, None, Some(&user_token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"].as_str(), Some("forbidden"));
    }
}

#[tokio::test]
async fn test_list_users_with_ingest_projection() {
    let server = TestServer::new().await;
    let (admin_token, _) =
        register_user(&server.router, "boss", "boss@x.com", "p", Some(ADMIN_KEY)).await;
    let (user_token, user_id) = register_user(&server.router, "u1", "u1@x.com", "p", None).await;

    upload_request(&server.router, "sales.xlsx", sales_workbook(), Some(&user_token)).await;

    let (status, body) =
        json_request(&server.router, "GET", "/admin/users", None, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);

    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);

    let entry = users
        .iter()
        .find(|u| u["id"].as_str() == Some(user_id.as_str()))
        .expect("user missing from admin listing");
    assert_eq!(entry["handle"].as_str(), Some("u1"));
    assert_eq!(entry["role"].as_str(), Some("user"));
    // Hashed secret is never exposed
    assert!(entry.get("password_hash").is_none());

    let uploads = entry["uploads"].as_array().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0]["original_name"].as_str(), Some("sales.xlsx"));
}

#[tokio::test]
async fn test_stats_counts_and_recent_ingests() {
    let server = TestServer::new().await;
    let (admin_token, _) =
        register_user(&server.router, "boss", "boss@x.com", "p", Some(ADMIN_KEY)).await;
    let (user_token, _) = register_user(&server.router, "u1", "u1@x.com", "p", None).await;

    let (_, body) =
        upload_request(&server.router, "sales.xlsx", sales_workbook(), Some(&user_token)).await;
    let ingest_id = body["upload"]["id"].as_str().unwrap().to_string();

    json_request(
        &server.router,
        "POST",
        "/charts",
        Some(json!({
            "title": "Revenue", "kind": "bar",
            "x_field": "Month", "y_field": "Revenue",
            "ingest_id": ingest_id,
        })),
        Some(&user_token),
    )
    .await;

    let (status, body) =
        json_request(&server.router, "GET", "/admin/stats", None, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["stats"]["total_users"].as_u64(), Some(2));
    assert_eq!(body["stats"]["total_ingests"].as_u64(), Some(1));
    assert_eq!(body["stats"]["total_charts"].as_u64(), Some(1));

    let recent = body["recent_ingests"].as_array().unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0]["original_name"].as_str(), Some("sales.xlsx"));
    assert_eq!(recent[0]["row_count"].as_i64(), Some(SALES_ROW_COUNT));
    assert_eq!(recent[0]["owner_handle"].as_str(), Some("u1"));
    assert_eq!(recent[0]["owner_email"].as_str(), Some("u1@x.com"));
}

#[tokio::test]
async fn test_delete_user_cascades() {
    let server = TestServer::new().await;
    let (admin_token, _) =
        register_user(&server.router, "boss", "boss@x.com", "p", Some(ADMIN_KEY)).await;
    let (user_token, user_id) = register_user(&server.router, "u1", "u1@x.com", "p", None).await;

    let (_, body) =
        upload_request(&server.router, "sales.xlsx", sales_workbook(), Some(&user_token)).await;
    let ingest_id = body["upload"]["id"].as_str().unwrap().to_string();

    json_request(
        &server.router,
        "POST",
        "/charts",
        Some(json!({
            "title": "Revenue", "kind": "bar",
            "x_field": "Month", "y_field": "Revenue",
            "ingest_id": ingest_id,
        })),
        Some(&user_token),
    )
    .await;
    assert_eq!(server.stored_file_count(), 1);

    let (status, _) = json_request(
        &server.router,
        "DELETE",
        &format!("/admin/users/{user_id}"),
        None,
        Some(&admin_token),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Rows and files are gone
    let (_, body) =
        json_request(&server.router, "GET", "/admin/stats", None, Some(&admin_token)).await;
    assert_eq!(body["stats"]["total_users"].as_u64(), Some(1));
    assert_eq!(body["stats"]["total_ingests"].as_u64(), Some(0));
    assert_eq!(body["stats"]["total_charts"].as_u64(), Some(0));
    assert_eq!(server.stored_file_count(), 0);

    // The deleted user's token no longer resolves
    let (status, _) =
        json_request(&server.router, "GET", "/auth/me", None, Some(&user_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_admin_is_invalid_operation() {
    let server = TestServer::new().await;
    let (admin_token, _) =
        register_user(&server.router, "boss", "boss@x.com", "p", Some(ADMIN_KEY)).await;
    let (_, other_admin_id) =
        register_user(&server.router, "boss2", "boss2@x.com", "p", Some(ADMIN_KEY)).await;

    let (status, body) = json_request(
        &server.router,
        "DELETE",
        &format!("/admin/users/{other_admin_id}"),
        None,
        Some(&admin_token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"].as_str(), Some("invalid_operation"));

    // Nothing was deleted
    let (_, body) =
        json_request(&server.router, "GET", "/admin/stats", None, Some(&admin_token)).await;
    assert_eq!(body["stats"]["total_users"].as_u64(), Some(2));
}

#[tokio::test]
async fn test_delete_missing_user() {
    let server = TestServer::new().await;
    let (admin_token, _) =
        register_user(&server.router, "boss", "boss@x.com", "p", Some(ADMIN_KEY)).await;

    let (status, _) = json_request(
        &server.router,
        "DELETE",
        "/admin/users/00000000-0000-0000-0000-000000000000",
        None,
        Some(&admin_token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user_gated() {
    let server = TestServer::new().await;
    let (user_token, user_id) = register_user(&server.router, "u1", "u1@x.com", "p", None).await;

    let (status, _) = json_request(
        &server.router,
        "DELETE",
        &format!("/admin/users/{user_id}"),
        None,
        Some(&user_token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = json_request(
        &server.router,
        "DELETE",
        &format!("/admin/users/{user_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
