//! Application use-cases.
//!
//! Each use-case validates its input, talks to repositories and the hashing
//! or token utilities, and answers with a [`UseCaseResponse`]. Errors never
//! escape a use-case: client errors become the matching failure type, and
//! everything else is logged and reported as `INTERNAL`.

pub mod auth;
pub mod crud;
pub mod post;
pub mod response;
pub mod user;

pub use auth::{
    AuthPayload, CheckAuth, CheckAuthInput, Login, LoginInput, RefreshToken, RefreshTokenInput,
    Register,
};
pub use crud::{DeleteById, GetAll, GetById, IdInput, ListInput};
pub use post::{
    AddPost, DeletePost, GetAllPosts, GetPostById, UpdatePost, UpdatePostInput,
};
pub use response::{ErrorType, Pagination, ResponseType, SuccessType, UseCaseResponse};
pub use user::{
    AddUser, DeleteUser, GetAllUsers, GetUserById, UpdateUser, UpdateUserInput,
};

use async_trait::async_trait;

/// A single application operation.
#[async_trait]
pub trait UseCase: Send + Sync {
    type Input: Send + 'static;
    type Output: Send;

    async fn execute(&self, input: Self::Input) -> UseCaseResponse<Self::Output>;
}
