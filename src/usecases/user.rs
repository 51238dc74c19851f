//! User management use-cases.

use std::sync::Arc;

use async_trait::async_trait;

use crate::entities::{NewUser, User, UserChanges};
use crate::error::AppError;
use crate::repositories::UserRepository;
use crate::usecases::{DeleteById, GetAll, GetById, UseCase, UseCaseResponse};
use crate::utils::password::PasswordHasher;

pub type GetUserById = GetById<User, dyn UserRepository>;
pub type GetAllUsers = GetAll<User, dyn UserRepository>;
pub type DeleteUser = DeleteById<User, dyn UserRepository>;

/// Creates a user. Email and name uniqueness is decided by the repository.
pub struct AddUser {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AddUser {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl UseCase for AddUser {
    type Input = NewUser;
    type Output = User;

    async fn execute(&self, input: NewUser) -> UseCaseResponse<User> {
        const INTERNAL: &str = "Failed to create user";

        let user = match User::create(input, self.hasher.as_ref()).await {
            Ok(user) => user,
            Err(e) => return UseCaseResponse::from_error(e, INTERNAL),
        };

        match self.users.add(user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id(), role = %user.role(), "User created");
                UseCaseResponse::created(user)
            }
            Err(e) => UseCaseResponse::from_error(e, INTERNAL),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub id: String,
    pub changes: UserChanges,
}

/// Applies a partial update. A new password is re-hashed.
pub struct UpdateUser {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UpdateUser {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl UseCase for UpdateUser {
    type Input = UpdateUserInput;
    type Output = User;

    async fn execute(&self, input: UpdateUserInput) -> UseCaseResponse<User> {
        const INTERNAL: &str = "Failed to update";

        let user = match self.users.find_by_id(&input.id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                let error = AppError::not_found("User", "id", &input.id);
                return UseCaseResponse::from_error(error, INTERNAL);
            }
            Err(e) => return UseCaseResponse::from_error(e, INTERNAL),
        };

        let updated = match user.apply(input.changes, self.hasher.as_ref()).await {
            Ok(updated) => updated,
            Err(e) => return UseCaseResponse::from_error(e, INTERNAL),
        };

        match self.users.update(updated).await {
            Ok(user) => UseCaseResponse::ok(user),
            Err(e) => UseCaseResponse::from_error(e, INTERNAL),
        }
    }
}
