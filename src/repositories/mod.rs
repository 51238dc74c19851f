//! Repository layer for data access operations.
//!
//! Each entity has a repository capability set. Two backends implement it:
//! an in-process store guarded by a `tokio` read/write lock, and PostgreSQL
//! through `diesel_async`. Unique keys are enforced by the backend itself,
//! so a collision is reported from `add`/`update` as [`AppError::Duplicate`].
//!
//! [`AppError::Duplicate`]: crate::error::AppError::Duplicate

mod memory;
mod post_repo;
mod seed;
mod user_repo;

pub use memory::InMemoryRepository;
pub use post_repo::PgPostRepository;
pub use seed::seed_admin;
pub use user_repo::PgUserRepository;

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::AsyncDbPool;
use crate::entities::{Entity, Post, User};
use crate::error::AppResult;

/// Storage capability shared by every entity.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Returns `None` when the id is unknown.
    async fn find_by_id(&self, id: &str) -> AppResult<Option<E>>;

    /// Returns every entity in a stable order (creation order).
    async fn find_all(&self) -> AppResult<Vec<E>>;

    /// Returns one window of [`Repository::find_all`] plus the total count.
    async fn find_page(&self, offset: usize, limit: usize) -> AppResult<(Vec<E>, usize)>;

    /// Inserts a new entity. Fails with `Duplicate` on a unique key collision.
    async fn add(&self, entity: E) -> AppResult<E>;

    /// Replaces an existing entity. Fails with `NotFound` if the id is absent.
    async fn update(&self, entity: E) -> AppResult<E>;

    /// Removes an entity. Fails with `NotFound` if the id is absent.
    async fn delete(&self, id: &str) -> AppResult<()>;
}

#[async_trait]
pub trait UserRepository: Repository<User> {
    /// Lookup is case-insensitive; emails are stored lower-cased.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>>;
}

#[async_trait]
pub trait PostRepository: Repository<Post> {
    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Post>>;
}

/// Converts a page window to SQL `OFFSET`/`LIMIT` values. `None` when the
/// offset is beyond what PostgreSQL accepts, which can only be an empty page.
pub(crate) fn sql_window(offset: usize, limit: usize) -> Option<(i64, i64)> {
    let offset = i64::try_from(offset).ok()?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    Some((offset, limit))
}

/// Selected storage backend, shared by every request.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryRepository::<User>::new()),
            posts: Arc::new(InMemoryRepository::<Post>::new()),
        }
    }

    pub fn postgres(pool: AsyncDbPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            posts: Arc::new(PgPostRepository::new(pool)),
        }
    }
}
