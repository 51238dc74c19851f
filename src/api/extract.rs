//! Request extractors that answer malformed input with a `VALIDATION`
//! envelope instead of axum's plain-text rejection.
//!
//! Schema validation itself stays inside the use-cases; these extractors
//! only deal with bodies and query strings that cannot be deserialized.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::usecases::UseCaseResponse;

pub type Rejection = UseCaseResponse<()>;

/// JSON body extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonInput<T>(pub T);

impl<T, S> FromRequest<S> for JsonInput<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = Rejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonInput(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

/// Query-string extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryInput<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryInput<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(QueryInput(value)),
            Err(rejection) => Err(query_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> Rejection {
    let message = match &rejection {
        JsonRejection::JsonSyntaxError(_) => "Malformed JSON in request body",
        JsonRejection::JsonDataError(_) => "Request body has an invalid shape",
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`"
        }
        JsonRejection::BytesRejection(_) => "Failed to read request body",
        _ => "Invalid request body",
    };
    tracing::debug!(rejection = %rejection.body_text(), "Rejected JSON body");
    UseCaseResponse::validation(message).with_error(rejection.body_text())
}

fn query_rejection(rejection: QueryRejection) -> Rejection {
    tracing::debug!(rejection = %rejection.body_text(), "Rejected query string");
    UseCaseResponse::validation("Invalid query parameters").with_error(rejection.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, StatusCode, header};
    use axum::response::IntoResponse;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    #[derive(Debug, Deserialize)]
    struct Paging {
        page: Option<usize>,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/test")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_json() {
        let JsonInput(payload) = JsonInput::<Payload>::from_request(json_request(r#"{"name":"x"}"#), &())
            .await
            .unwrap();
        assert_eq!(payload.name, "x");
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_envelope() {
        let rejection = JsonInput::<Payload>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();

        assert!(!rejection.success);
        assert_eq!(rejection.message, "Malformed JSON in request body");
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/test")
            .body(Body::from(r#"{"name":"x"}"#))
            .unwrap();

        let rejection = JsonInput::<Payload>::from_request(request, &())
            .await
            .unwrap_err();
        assert!(rejection.message.contains("Content-Type"));
    }

    #[tokio::test]
    async fn test_query_rejection() {
        let request = Request::builder()
            .uri("/test?page=abc")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let rejection = QueryInput::<Paging>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(rejection.message, "Invalid query parameters");
        assert!(rejection.error.is_some());
    }

    #[tokio::test]
    async fn test_query_accepts_missing_fields() {
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let (mut parts, _) = request.into_parts();

        let QueryInput(paging) = QueryInput::<Paging>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(paging.page.is_none());
    }
}
