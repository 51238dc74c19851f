//! User CRUD request handlers. Mounted behind the admin role check.

use axum::extract::{Path, State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::USER_TAG;
use crate::api::extract::{JsonInput, QueryInput};
use crate::entities::{NewUser, User, UserChanges};
use crate::state::AppState;
use crate::usecases::{IdInput, ListInput, UpdateUserInput, UseCase, UseCaseResponse};

/// Creates user-related routes.
///
/// Routes:
/// - GET /            - List users, optionally paginated
/// - POST /           - Create a user
/// - GET /{id}        - Get user by ID
/// - PATCH|PUT /{id}  - Update user by ID
/// - DELETE /{id}     - Delete user by ID
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users))
        .routes(routes!(create_user))
        .routes(routes!(get_user))
        .routes(routes!(update_user))
        .routes(routes!(replace_user))
        .routes(routes!(delete_user))
}

/// GET /users - List users
///
/// Pagination is applied only when `page` or `limit` is given.
#[utoipa::path(
    get,
    path = "/",
    tag = USER_TAG,
    params(ListInput),
    responses(
        (status = 200, description = "Users, with pagination metadata when paged", body = UseCaseResponse<Vec<User>>),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 401, description = "Missing token or not an admin")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_users(
    State(state): State<AppState>,
    QueryInput(input): QueryInput<ListInput>,
) -> UseCaseResponse<Vec<User>> {
    state.usecases.get_all_users.execute(input).await
}

/// POST /users - Create user
#[utoipa::path(
    post,
    path = "/",
    tag = USER_TAG,
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = UseCaseResponse<User>),
        (status = 400, description = "Invalid user data"),
        (status = 409, description = "Email or name already taken")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn create_user(
    State(state): State<AppState>,
    JsonInput(input): JsonInput<NewUser>,
) -> UseCaseResponse<User> {
    state.usecases.add_user.execute(input).await
}

/// GET /users/{id} - Get user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = USER_TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UseCaseResponse<User>),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> UseCaseResponse<User> {
    state.usecases.get_user_by_id.execute(IdInput::from(id)).await
}

/// PATCH /users/{id} - Update user
///
/// A new password is hashed before it is stored.
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = USER_TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UserChanges,
    responses(
        (status = 200, description = "User updated", body = UseCaseResponse<User>),
        (status = 400, description = "Invalid changes"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email or name already taken")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonInput(changes): JsonInput<UserChanges>,
) -> UseCaseResponse<User> {
    state
        .usecases
        .update_user
        .execute(UpdateUserInput { id, changes })
        .await
}

/// PUT /users/{id} - Update user
///
/// PUT behaves like PATCH: absent fields keep their stored value.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = USER_TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UserChanges,
    responses(
        (status = 200, description = "User updated", body = UseCaseResponse<User>),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn replace_user(
    state: State<AppState>,
    id: Path<String>,
    changes: JsonInput<UserChanges>,
) -> UseCaseResponse<User> {
    update_user(state, id, changes).await
}

/// DELETE /users/{id} - Delete user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = USER_TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> UseCaseResponse<()> {
    state.usecases.delete_user.execute(IdInput::from(id)).await
}
