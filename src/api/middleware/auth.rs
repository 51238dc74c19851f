//! Role-checking authentication middleware.
//!
//! Reads the `Authorization: Bearer <token>` header, runs the `CheckAuth`
//! use-case for the route's role and stores the resolved user in the request
//! extensions. Failures are answered with the use-case envelope.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::entities::{Role, User};
use crate::state::AppState;
use crate::usecases::{CheckAuthInput, UseCase};

/// The authenticated caller, available to handlers behind the role check.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

fn bearer_token(request: &Request) -> Option<String> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim().to_string())
}

async fn authorize(state: AppState, role: Role, mut request: Request, next: Next) -> Response {
    let input = CheckAuthInput::new(bearer_token(&request), role);
    let response = state.usecases.check_auth.execute(input).await;

    match response.data {
        Some(user) if response.success => {
            request.extensions_mut().insert(AuthUser(user));
            next.run(request).await
        }
        _ => response.into_response(),
    }
}

pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    authorize(state, Role::Admin, request, next).await
}

pub async fn require_user(State(state): State<AppState>, request: Request, next: Next) -> Response {
    authorize(state, Role::User, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(header_value: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header_value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(
            bearer_token(&request_with(Some("Bearer abc.def"))).as_deref(),
            Some("abc.def")
        );
        assert_eq!(
            bearer_token(&request_with(Some("bearer abc"))).as_deref(),
            Some("abc")
        );
        assert!(bearer_token(&request_with(Some("Basic abc"))).is_none());
        assert!(bearer_token(&request_with(Some("abc"))).is_none());
        assert!(bearer_token(&request_with(None)).is_none());
    }
}
