//! Last-resort error handling.
//!
//! Responses produced outside the use-cases (unknown routes, unsupported
//! methods, framework rejections) arrive here as plain text or empty bodies.
//! They are rewritten into the failure envelope so every error a client sees
//! has the same shape. Responses that are already JSON pass through.

use axum::{
    Json,
    body::Body,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::usecases::{ErrorType, UseCaseResponse};

/// Largest plain-text body copied into the envelope's `error` field.
const MAX_ERROR_BODY: usize = 4 * 1024;

fn error_type(status: StatusCode) -> ErrorType {
    match status {
        StatusCode::UNAUTHORIZED => ErrorType::Unauthorized,
        StatusCode::FORBIDDEN => ErrorType::Forbidden,
        StatusCode::NOT_FOUND => ErrorType::NotFound,
        StatusCode::CONFLICT => ErrorType::Conflict,
        s if s.is_server_error() => ErrorType::Internal,
        _ => ErrorType::Validation,
    }
}

fn default_message(status: StatusCode) -> String {
    match status {
        StatusCode::NOT_FOUND => "The requested resource was not found".to_string(),
        StatusCode::METHOD_NOT_ALLOWED => "HTTP method not allowed for this endpoint".to_string(),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "Unsupported media type".to_string(),
        StatusCode::PAYLOAD_TOO_LARGE => "Request payload too large".to_string(),
        s if s.is_server_error() => "An internal server error occurred".to_string(),
        s => s
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let detail = match axum::body::to_bytes(body, MAX_ERROR_BODY).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(_) => String::new(),
    };

    let mut envelope = UseCaseResponse::<()>::failure(default_message(status), error_type(status));
    // Server-side bodies may carry internals; keep only client error details.
    if status.is_client_error() && !detail.is_empty() {
        envelope = envelope.with_error(detail);
    }

    let mut rewritten = (status, Json(envelope)).into_response();
    for (name, value) in parts.headers.iter() {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            rewritten.headers_mut().append(name.clone(), value.clone());
        }
    }
    rewritten
}

/// Fallback for routes that do not exist.
pub async fn not_found_fallback() -> Response {
    (StatusCode::NOT_FOUND, Body::empty()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::AppendHeaders;
    use axum::{Router, middleware, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/json", get(|| async { UseCaseResponse::<()>::not_found("Post with id 1 not found") }))
            .route("/text", get(|| async { (StatusCode::BAD_REQUEST, "bad things") }))
            .route("/boom", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "stack trace") }))
            .route(
                "/challenge",
                get(|| async {
                    (
                        StatusCode::UNAUTHORIZED,
                        AppendHeaders([
                            (header::WWW_AUTHENTICATE, "Basic"),
                            (header::WWW_AUTHENTICATE, "Bearer"),
                        ]),
                        "denied",
                    )
                }),
            )
            .fallback(not_found_fallback)
            .layer(middleware::from_fn(global_error_handler))
    }

    async fn call(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unknown_route_becomes_envelope() {
        let (status, body) = call("/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["type"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_json_errors_pass_through() {
        let (status, body) = call("/json").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Post with id 1 not found");
    }

    #[tokio::test]
    async fn test_plain_text_client_error_keeps_detail() {
        let (status, body) = call("/text").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["type"], "VALIDATION");
        assert_eq!(body["error"], "bad things");
    }

    #[tokio::test]
    async fn test_server_error_hides_detail() {
        let (status, body) = call("/boom").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["type"], "INTERNAL");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_rewrite_keeps_repeated_headers() {
        let response = app()
            .oneshot(Request::builder().uri("/challenge").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let challenges: Vec<_> = response
            .headers()
            .get_all(header::WWW_AUTHENTICATE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(challenges, vec!["Basic", "Bearer"]);
        assert!(is_json(&response));
    }
}
