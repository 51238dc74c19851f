//! Shared harness for the HTTP integration tests: an in-memory application
//! driven in-process through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use postboard::api::create_router;
use postboard::repositories::seed_admin;
use postboard::state::AppState;
use postboard::utils::jwt::JwtService;
use postboard::utils::password::{Argon2Hasher, PasswordHasher};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        // Minimal Argon2 parameters keep the suite fast.
        let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::with_memory(1024, 1).unwrap());
        let jwt = Arc::new(JwtService::new(
            "integration-test-secret-0123456789abcdef",
            chrono::Duration::minutes(15),
            chrono::Duration::days(7),
        ));
        let state = AppState::in_memory(hasher.clone(), jwt);

        seed_admin(
            state.repositories.users.as_ref(),
            hasher.as_ref(),
            ADMIN_EMAIL,
            ADMIN_PASSWORD,
        )
        .await
        .unwrap();

        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn register(&self, email: &str, name: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": email, "name": name, "password": password })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    pub async fn admin_token(&self) -> String {
        let (status, body) = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        access_token(&body)
    }

    /// Registers a regular user and returns `(user_id, access_token)`.
    pub async fn user(&self, email: &str) -> (String, String) {
        let name = format!("{}_user", email.split('@').next().unwrap_or(email));
        let (status, body) = self.register(email, &name, "password1").await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        let id = body["data"]["user"]["id"].as_str().unwrap().to_string();
        (id, access_token(&body))
    }

    pub async fn user_count(&self) -> usize {
        self.state.repositories.users.find_all().await.unwrap().len()
    }
}

pub fn access_token(body: &Value) -> String {
    body["data"]["token"]["accessToken"]
        .as_str()
        .unwrap()
        .to_string()
}
