//! Post CRUD request handlers. Mounted behind the user role check.

use axum::Extension;
use axum::extract::{Path, State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::POST_TAG;
use crate::api::extract::{JsonInput, QueryInput};
use crate::api::middleware::AuthUser;
use crate::entities::{NewPost, Post, PostChanges};
use crate::state::AppState;
use crate::usecases::{IdInput, ListInput, UpdatePostInput, UseCase, UseCaseResponse};

pub fn post_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_posts))
        .routes(routes!(create_post))
        .routes(routes!(get_post))
        .routes(routes!(update_post))
        .routes(routes!(replace_post))
        .routes(routes!(delete_post))
}

/// GET /posts - List posts
#[utoipa::path(
    get,
    path = "/",
    tag = POST_TAG,
    params(ListInput),
    responses(
        (status = 200, description = "Posts, with pagination metadata when paged", body = UseCaseResponse<Vec<Post>>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_posts(
    State(state): State<AppState>,
    QueryInput(input): QueryInput<ListInput>,
) -> UseCaseResponse<Vec<Post>> {
    state.usecases.get_all_posts.execute(input).await
}

/// POST /posts - Create post
///
/// `userId` defaults to the authenticated caller.
#[utoipa::path(
    post,
    path = "/",
    tag = POST_TAG,
    request_body = NewPost,
    responses(
        (status = 201, description = "Post created", body = UseCaseResponse<Post>),
        (status = 400, description = "Invalid post data")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn create_post(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    JsonInput(mut input): JsonInput<NewPost>,
) -> UseCaseResponse<Post> {
    if input.user_id.as_deref().is_none_or(|id| id.trim().is_empty()) {
        input.user_id = Some(user.id().to_string());
    }
    state.usecases.add_post.execute(input).await
}

/// GET /posts/{id} - Get post by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = POST_TAG,
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post found", body = UseCaseResponse<Post>),
        (status = 404, description = "Post not found")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> UseCaseResponse<Post> {
    state.usecases.get_post_by_id.execute(IdInput::from(id)).await
}

/// PATCH /posts/{id} - Update post
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = POST_TAG,
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    request_body = PostChanges,
    responses(
        (status = 200, description = "Post updated", body = UseCaseResponse<Post>),
        (status = 400, description = "Invalid changes"),
        (status = 404, description = "Post not found")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonInput(changes): JsonInput<PostChanges>,
) -> UseCaseResponse<Post> {
    state
        .usecases
        .update_post
        .execute(UpdatePostInput { id, changes })
        .await
}

/// PUT /posts/{id} - Update post, same as PATCH
#[utoipa::path(
    put,
    path = "/{id}",
    tag = POST_TAG,
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    request_body = PostChanges,
    responses(
        (status = 200, description = "Post updated", body = UseCaseResponse<Post>),
        (status = 404, description = "Post not found")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn replace_post(
    state: State<AppState>,
    id: Path<String>,
    changes: JsonInput<PostChanges>,
) -> UseCaseResponse<Post> {
    update_post(state, id, changes).await
}

/// DELETE /posts/{id} - Delete post
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = POST_TAG,
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "Post not found")
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn delete_post(State(state): State<AppState>, Path(id): Path<String>) -> UseCaseResponse<()> {
    state.usecases.delete_post.execute(IdInput::from(id)).await
}
