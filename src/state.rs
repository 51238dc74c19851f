//! Application state for the Axum router.
//!
//! Acts as the dependency-injection container: every use-case is built once
//! at startup from the selected repositories, the password hasher and the
//! token service, and shared across requests behind an `Arc`.

use std::sync::Arc;

use crate::config::StorageBackend;
use crate::repositories::Repositories;
use crate::usecases::{
    AddPost, AddUser, CheckAuth, DeletePost, DeleteUser, GetAllPosts, GetAllUsers, GetPostById,
    GetUserById, Login, RefreshToken, Register, UpdatePost, UpdateUser,
};
use crate::utils::jwt::JwtService;
use crate::utils::password::PasswordHasher;

/// Every use-case exposed over HTTP.
pub struct UseCases {
    pub login: Login,
    pub register: Register,
    pub refresh_token: RefreshToken,
    pub check_auth: CheckAuth,

    pub get_user_by_id: GetUserById,
    pub get_all_users: GetAllUsers,
    pub add_user: Arc<AddUser>,
    pub update_user: UpdateUser,
    pub delete_user: DeleteUser,

    pub get_post_by_id: GetPostById,
    pub get_all_posts: GetAllPosts,
    pub add_post: AddPost,
    pub update_post: UpdatePost,
    pub delete_post: DeletePost,
}

impl UseCases {
    pub fn new(
        repos: &Repositories,
        hasher: Arc<dyn PasswordHasher>,
        jwt: Arc<JwtService>,
    ) -> Self {
        let users = &repos.users;
        let posts = &repos.posts;
        let add_user = Arc::new(AddUser::new(users.clone(), hasher.clone()));

        Self {
            login: Login::new(users.clone(), hasher.clone(), jwt.clone()),
            register: Register::new(add_user.clone(), jwt.clone()),
            refresh_token: RefreshToken::new(users.clone(), jwt.clone()),
            check_auth: CheckAuth::new(users.clone(), jwt),

            get_user_by_id: GetUserById::new(users.clone()),
            get_all_users: GetAllUsers::new(users.clone()),
            add_user,
            update_user: UpdateUser::new(users.clone(), hasher),
            delete_user: DeleteUser::new(users.clone()),

            get_post_by_id: GetPostById::new(posts.clone()),
            get_all_posts: GetAllPosts::new(posts.clone()),
            add_post: AddPost::new(posts.clone()),
            update_post: UpdatePost::new(posts.clone()),
            delete_post: DeletePost::new(posts.clone()),
        }
    }
}

/// Shared per-request state. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub usecases: Arc<UseCases>,
    pub repositories: Repositories,
    /// Storage backend reported by the health check
    pub backend: StorageBackend,
}

impl AppState {
    pub fn new(
        repositories: Repositories,
        backend: StorageBackend,
        hasher: Arc<dyn PasswordHasher>,
        jwt: Arc<JwtService>,
    ) -> Self {
        let usecases = Arc::new(UseCases::new(&repositories, hasher, jwt));
        Self {
            usecases,
            repositories,
            backend,
        }
    }

    /// State backed by fresh in-memory repositories.
    pub fn in_memory(hasher: Arc<dyn PasswordHasher>, jwt: Arc<JwtService>) -> Self {
        Self::new(Repositories::in_memory(), StorageBackend::InMemory, hasher, jwt)
    }
}
