//! Authentication handlers for registration, login and token refresh.

use axum::extract::State;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::extract::JsonInput;
use crate::entities::NewUser;
use crate::state::AppState;
use crate::usecases::{AuthPayload, LoginInput, RefreshTokenInput, UseCase, UseCaseResponse};

/// Creates the authentication routes
///
/// # Routes
/// - `POST /register` - Register a new user and sign them in
/// - `POST /login` - Authenticate with email and password
/// - `POST /refresh` - Exchange a refresh token for a new pair
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(register))
        .routes(routes!(login))
        .routes(routes!(refresh_token))
}

/// POST /auth/register - Register new user
///
/// Creates a user account, `user` role unless one is given, and returns a token pair.
#[utoipa::path(
    post,
    path = "/register",
    tag = AUTH_TAG,
    request_body = NewUser,
    responses(
        (status = 201, description = "User registered", body = UseCaseResponse<AuthPayload>),
        (status = 400, description = "Invalid registration data"),
        (status = 409, description = "Email or name already taken")
    )
)]
async fn register(
    State(state): State<AppState>,
    JsonInput(input): JsonInput<NewUser>,
) -> UseCaseResponse<AuthPayload> {
    state.usecases.register.execute(input).await
}

/// POST /auth/login - Authenticate user
///
/// Checks email and password, returns access and refresh tokens.
#[utoipa::path(
    post,
    path = "/login",
    tag = AUTH_TAG,
    request_body = LoginInput,
    responses(
        (status = 200, description = "Login successful", body = UseCaseResponse<AuthPayload>),
        (status = 400, description = "Invalid credentials format"),
        (status = 401, description = "Invalid email or password")
    )
)]
async fn login(
    State(state): State<AppState>,
    JsonInput(input): JsonInput<LoginInput>,
) -> UseCaseResponse<AuthPayload> {
    state.usecases.login.execute(input).await
}

/// POST /auth/refresh - Refresh access token
///
/// Only refresh tokens are accepted; an access token is rejected.
#[utoipa::path(
    post,
    path = "/refresh",
    tag = AUTH_TAG,
    request_body = RefreshTokenInput,
    responses(
        (status = 200, description = "Token refreshed", body = UseCaseResponse<AuthPayload>),
        (status = 400, description = "Refresh token missing"),
        (status = 401, description = "Invalid or expired refresh token")
    )
)]
async fn refresh_token(
    State(state): State<AppState>,
    JsonInput(input): JsonInput<RefreshTokenInput>,
) -> UseCaseResponse<AuthPayload> {
    state.usecases.refresh_token.execute(input).await
}
