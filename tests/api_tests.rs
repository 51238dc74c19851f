//! End-to-end tests of the HTTP API against the in-memory store.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::json;

use common::{ADMIN_EMAIL, ADMIN_PASSWORD, TestApp, access_token};

#[tokio::test]
async fn test_health_reports_backend() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["type"], "OK");
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["storage"], "in_memory");
}

#[tokio::test]
async fn test_register_returns_user_and_tokens() {
    let app = TestApp::new().await;

    let (status, body) = app.register("Jane@Example.com", "jane", "password1").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["type"], "CREATED");
    let user = &body["data"]["user"];
    assert_eq!(user["email"], "jane@example.com");
    assert_eq!(user["role"], "user");
    assert!(user.get("passwordHash").is_none());
    assert!(!access_token(&body).is_empty());
}

#[tokio::test]
async fn test_register_twice_conflicts() {
    let app = TestApp::new().await;
    app.user("jane@example.com").await;
    let before = app.user_count().await;

    let (status, body) = app.register("jane@example.com", "other", "password1").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["type"], "CONFLICT");
    assert_eq!(app.user_count().await, before);
}

#[tokio::test]
async fn test_register_invalid_input_persists_nothing() {
    let app = TestApp::new().await;
    let before = app.user_count().await;

    let (status, body) = app.register("not-an-email", "jane", "short").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "VALIDATION");
    assert_eq!(app.user_count().await, before);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::new().await;
    app.user("jane@example.com").await;

    let (status, body) = app.login("jane@example.com", "wrong-password").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["type"], "UNAUTHORIZED");
    assert_eq!(body["message"], "Invalid email or password");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_login_returns_distinct_tokens() {
    let app = TestApp::new().await;

    let (status, body) = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    assert_eq!(status, StatusCode::OK);
    let token = &body["data"]["token"];
    let access = token["accessToken"].as_str().unwrap();
    let refresh = token["refreshToken"].as_str().unwrap();
    assert!(!access.is_empty());
    assert!(!refresh.is_empty());
    assert_ne!(access, refresh);
    assert!(body["data"]["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_refresh_issues_new_pair() {
    let app = TestApp::new().await;
    let (_, body) = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let refresh = body["data"]["token"]["refreshToken"].clone();

    let (status, body) = app
        .request(Method::POST, "/auth/refresh", None, Some(json!({ "refreshToken": refresh })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], ADMIN_EMAIL);

    // An access token is not accepted as a refresh token
    let access = access_token(&body);
    let (status, _) = app
        .request(Method::POST, "/auth/refresh", None, Some(json!({ "refreshToken": access })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_json_is_validation_envelope() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["type"], "VALIDATION");
}

#[tokio::test]
async fn test_users_require_token() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/users", None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Access token is required");
}

#[tokio::test]
async fn test_user_token_cannot_manage_users() {
    let app = TestApp::new().await;
    let (_, token) = app.user("jane@example.com").await;

    let (status, body) = app.request(Method::GET, "/users", Some(&token), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["type"], "UNAUTHORIZED");
    assert_eq!(body["message"], "User role does not match");
}

#[tokio::test]
async fn test_admin_lists_users_with_pagination() {
    let app = TestApp::new().await;
    app.user("a@example.com").await;
    app.user("b@example.com").await;
    let token = app.admin_token().await;

    let (status, body) = app.request(Method::GET, "/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert!(body.get("pagination").is_none());

    let (status, body) = app
        .request(Method::GET, "/users?page=2&limit=2", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"], json!({ "page": 2, "limit": 2, "total": 3, "pages": 2 }));

    let (status, body) = app
        .request(Method::GET, "/users?limit=500", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Limit must be between 1 and 100");
}

#[tokio::test]
async fn test_admin_user_crud() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/users",
            Some(&token),
            Some(json!({ "email": "bob@example.com", "name": "bob", "password": "password1" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .request(Method::PATCH, &format!("/users/{}", id), Some(&token), Some(json!({ "name": "robert" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "robert");
    assert_eq!(body["data"]["email"], "bob@example.com");

    let (status, body) = app
        .request(Method::PUT, &format!("/users/{}", id), Some(&token), Some(json!({ "role": "admin" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "admin");

    let (status, body) = app
        .request(Method::DELETE, &format!("/users/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = app
        .request(Method::GET, &format!("/users/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("User with id {} not found", id));
}

#[tokio::test]
async fn test_delete_missing_user_is_not_found() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let before = app.user_count().await;

    let (status, body) = app
        .request(Method::DELETE, "/users/does-not-exist", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["type"], "NOT_FOUND");
    assert_eq!(app.user_count().await, before);
}

#[tokio::test]
async fn test_post_defaults_author_to_caller() {
    let app = TestApp::new().await;
    let (user_id, token) = app.user("jane@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/posts",
            Some(&token),
            Some(json!({ "title": "Hello", "content": "First post" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["userId"], user_id.as_str());
    let post_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .request(Method::PATCH, &format!("/posts/{}", post_id), Some(&token), Some(json!({ "title": "Hello again" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Hello again");
    assert_eq!(body["data"]["content"], "First post");

    let (status, body) = app.request(Method::GET, "/posts", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_post_validation() {
    let app = TestApp::new().await;
    let (_, token) = app.user("jane@example.com").await;

    let (status, body) = app
        .request(Method::POST, "/posts", Some(&token), Some(json!({ "title": "", "content": "" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "VALIDATION");
}

#[tokio::test]
async fn test_admin_token_rejected_for_posts() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, _) = app.request(Method::GET, "/posts", Some(&token), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_route_is_envelope() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/nope", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["type"], "NOT_FOUND");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(Method::GET, "/api-docs/openapi.json", None, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Postboard");
    assert!(body["components"]["securitySchemes"]["bearerAuth"].is_object());
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .request(
            Method::GET,
            "/users?page=18446744073709551615&limit=100",
            Some(&token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_oversized_fields_are_validation_errors() {
    let app = TestApp::new().await;
    let before = app.user_count().await;

    let name = "n".repeat(300);
    let (status, body) = app.register("jane@example.com", &name, "password1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "VALIDATION");
    assert_eq!(app.user_count().await, before);

    let (_, token) = app.user("poster@example.com").await;
    let (status, body) = app
        .request(
            Method::POST,
            "/posts",
            Some(&token),
            Some(json!({ "title": "Hello", "content": "World", "userId": "u".repeat(40) })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User id must be between 1 and 36 characters long");
}
