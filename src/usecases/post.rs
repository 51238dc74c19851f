//! Post management use-cases.

use std::sync::Arc;

use async_trait::async_trait;

use crate::entities::{NewPost, Post, PostChanges};
use crate::error::AppError;
use crate::repositories::PostRepository;
use crate::usecases::{DeleteById, GetAll, GetById, UseCase, UseCaseResponse};

pub type GetPostById = GetById<Post, dyn PostRepository>;
pub type GetAllPosts = GetAll<Post, dyn PostRepository>;
pub type DeletePost = DeleteById<Post, dyn PostRepository>;

pub struct AddPost {
    posts: Arc<dyn PostRepository>,
}

impl AddPost {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl UseCase for AddPost {
    type Input = NewPost;
    type Output = Post;

    async fn execute(&self, input: NewPost) -> UseCaseResponse<Post> {
        const INTERNAL: &str = "Failed to create post";

        let post = match Post::create(input) {
            Ok(post) => post,
            Err(e) => return UseCaseResponse::from_error(e, INTERNAL),
        };

        match self.posts.add(post).await {
            Ok(post) => {
                tracing::info!(post_id = %post.id(), user_id = %post.user_id(), "Post created");
                UseCaseResponse::created(post)
            }
            Err(e) => UseCaseResponse::from_error(e, INTERNAL),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePostInput {
    pub id: String,
    pub changes: PostChanges,
}

pub struct UpdatePost {
    posts: Arc<dyn PostRepository>,
}

impl UpdatePost {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl UseCase for UpdatePost {
    type Input = UpdatePostInput;
    type Output = Post;

    async fn execute(&self, input: UpdatePostInput) -> UseCaseResponse<Post> {
        const INTERNAL: &str = "Failed to update";

        let post = match self.posts.find_by_id(&input.id).await {
            Ok(Some(post)) => post,
            Ok(None) => {
                let error = AppError::not_found("Post", "id", &input.id);
                return UseCaseResponse::from_error(error, INTERNAL);
            }
            Err(e) => return UseCaseResponse::from_error(e, INTERNAL),
        };

        let updated = match post.apply(input.changes) {
            Ok(updated) => updated,
            Err(e) => return UseCaseResponse::from_error(e, INTERNAL),
        };

        match self.posts.update(updated).await {
            Ok(post) => UseCaseResponse::ok(post),
            Err(e) => UseCaseResponse::from_error(e, INTERNAL),
        }
    }
}
