//! Use-cases shared by every entity: lookup by id, listing and deletion.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::entities::Entity;
use crate::repositories::Repository;
use crate::usecases::{Pagination, UseCase, UseCaseResponse};

const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct IdInput {
    #[validate(length(min = 1, message = "ID cannot be empty"))]
    pub id: String,
}

impl From<String> for IdInput {
    fn from(id: String) -> Self {
        Self { id }
    }
}

/// Optional paging. Without `page` and `limit` the whole collection is returned.
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListInput {
    /// 1-based page number
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<usize>,
    /// Items per page, at most 100
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<usize>,
}

impl ListInput {
    pub fn page(page: usize, limit: usize) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    fn window(&self) -> Option<(usize, usize)> {
        match (self.page, self.limit) {
            (None, None) => None,
            (page, limit) => Some((page.unwrap_or(1), limit.unwrap_or(DEFAULT_PAGE_SIZE))),
        }
    }
}

pub struct GetById<E, R: ?Sized> {
    repository: Arc<R>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R: ?Sized> GetById<E, R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E, R> UseCase for GetById<E, R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    type Input = IdInput;
    type Output = E;

    async fn execute(&self, input: IdInput) -> UseCaseResponse<E> {
        let internal = format!("Failed to retrieve the {}.", E::NAME);
        if let Err(e) = input.validate() {
            return UseCaseResponse::from_error(e.into(), &internal);
        }

        match self.repository.find_by_id(&input.id).await {
            Ok(Some(entity)) => UseCaseResponse::ok(entity),
            Ok(None) => {
                UseCaseResponse::not_found(format!("{} with id {} not found", E::NAME, input.id))
            }
            Err(e) => UseCaseResponse::from_error(e, &internal),
        }
    }
}

pub struct GetAll<E, R: ?Sized> {
    repository: Arc<R>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R: ?Sized> GetAll<E, R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E, R> UseCase for GetAll<E, R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    type Input = ListInput;
    type Output = Vec<E>;

    async fn execute(&self, input: ListInput) -> UseCaseResponse<Vec<E>> {
        const INTERNAL: &str = "Failed to retrieve";
        if let Err(e) = input.validate() {
            return UseCaseResponse::from_error(e.into(), INTERNAL);
        }

        let Some((page, limit)) = input.window() else {
            return match self.repository.find_all().await {
                Ok(entities) => UseCaseResponse::ok(entities),
                Err(e) => UseCaseResponse::from_error(e, INTERNAL),
            };
        };

        let offset = (page - 1).saturating_mul(limit);
        match self.repository.find_page(offset, limit).await {
            Ok((entities, total)) => UseCaseResponse::ok(entities)
                .with_pagination(Pagination::new(page, limit, total)),
            Err(e) => UseCaseResponse::from_error(e, INTERNAL),
        }
    }
}

pub struct DeleteById<E, R: ?Sized> {
    repository: Arc<R>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R: ?Sized> DeleteById<E, R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E, R> UseCase for DeleteById<E, R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    type Input = IdInput;
    type Output = ();

    async fn execute(&self, input: IdInput) -> UseCaseResponse<()> {
        const INTERNAL: &str = "Failed to delete";
        if let Err(e) = input.validate() {
            return UseCaseResponse::from_error(e.into(), INTERNAL);
        }

        match self.repository.delete(&input.id).await {
            Ok(()) => {
                tracing::info!(entity = E::NAME, id = %input.id, "Deleted");
                UseCaseResponse::no_content()
            }
            Err(e) => UseCaseResponse::from_error(e, INTERNAL),
        }
    }
}
