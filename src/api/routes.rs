//! Router configuration for the API.

use std::time::Duration;

use axum::{
    Json, Router,
    http::{Method, header},
    middleware,
    routing::get,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    global_error_handler, logging_middleware, not_found_fallback, request_id_middleware,
    require_admin, require_user,
};
use crate::state::AppState;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// All documented routes. `/users` requires an admin token and `/posts` a
/// user token; the auth routes and the health check are public.
pub fn api_router(state: &AppState) -> OpenApiRouter<AppState> {
    let users = handlers::users::user_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
    let posts = handlers::posts::post_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/auth", handlers::auth::auth_routes())
        .nest("/users", users)
        .nest("/posts", posts)
        .merge(handlers::health::health_routes())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Creates the application router with all routes and middleware.
///
/// Middleware is applied in reverse order of declaration: the request ID is
/// assigned first, then logging, CORS and compression, and the error
/// handler sits closest to the handlers so it sees their raw responses.
pub fn create_router(state: AppState) -> Router {
    let (router, openapi) = api_router(&state).split_for_parts();

    router
        .route(
            OPENAPI_PATH,
            get(move || {
                let doc = openapi.clone();
                async move { Json(doc) }
            }),
        )
        .fallback(not_found_fallback)
        .layer(middleware::from_fn(global_error_handler))
        .layer(CompressionLayer::new())
        .layer(cors_layer())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
