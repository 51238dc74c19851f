use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::entities::{Entity, Post, User};
use crate::error::{AppError, AppResult};
use crate::repositories::{PostRepository, Repository, UserRepository};

/// In-process store backed by a vector, kept in insertion order.
///
/// Every operation holds the lock for its whole critical section, so the
/// uniqueness check and the write it guards happen atomically.
#[derive(Debug, Clone)]
pub struct InMemoryRepository<E> {
    items: Arc<RwLock<Vec<E>>>,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(items: Vec<E>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    async fn find_where<F>(&self, predicate: F) -> Option<E>
    where
        F: Fn(&E) -> bool + Send,
    {
        self.items.read().await.iter().find(|e| predicate(*e)).cloned()
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the first unique key of `candidate` already held by another entity.
fn find_collision<E: Entity>(items: &[E], candidate: &E) -> Option<(&'static str, String)> {
    let keys = candidate.unique_keys();
    items
        .iter()
        .filter(|existing| existing.id() != candidate.id())
        .find_map(|existing| {
            let taken = existing.unique_keys();
            keys.iter()
                .find(|key| taken.contains(*key))
                .cloned()
        })
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<E>> {
        Ok(self.find_where(|e| e.id() == id).await)
    }

    async fn find_all(&self) -> AppResult<Vec<E>> {
        Ok(self.items.read().await.clone())
    }

    async fn find_page(&self, offset: usize, limit: usize) -> AppResult<(Vec<E>, usize)> {
        let items = self.items.read().await;
        let page = items.iter().skip(offset).take(limit).cloned().collect();
        Ok((page, items.len()))
    }

    async fn add(&self, entity: E) -> AppResult<E> {
        let mut items = self.items.write().await;

        if items.iter().any(|e| e.id() == entity.id()) {
            return Err(AppError::duplicate(E::NAME, "id", entity.id()));
        }
        if let Some((field, value)) = find_collision(&items, &entity) {
            return Err(AppError::duplicate(E::NAME, field, value));
        }

        items.push(entity.clone());
        tracing::debug!(entity = E::NAME, id = %entity.id(), "Stored entity");
        Ok(entity)
    }

    async fn update(&self, entity: E) -> AppResult<E> {
        let mut items = self.items.write().await;

        let index = items
            .iter()
            .position(|e| e.id() == entity.id())
            .ok_or_else(|| AppError::not_found(E::NAME, "id", entity.id()))?;
        if let Some((field, value)) = find_collision(&items, &entity) {
            return Err(AppError::duplicate(E::NAME, field, value));
        }

        items[index] = entity.clone();
        tracing::debug!(entity = E::NAME, id = %entity.id(), "Updated entity");
        Ok(entity)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut items = self.items.write().await;

        let index = items
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| AppError::not_found(E::NAME, "id", id))?;
        items.remove(index);
        tracing::debug!(entity = E::NAME, id = %id, "Deleted entity");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository<User> {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.trim().to_lowercase();
        Ok(self.find_where(|u| u.email() == email).await)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>> {
        Ok(self.find_where(|u| u.name() == Some(name)).await)
    }
}

#[async_trait]
impl PostRepository for InMemoryRepository<Post> {
    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Post>> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|p| p.user_id() == user_id)
            .cloned()
            .collect())
    }
}
