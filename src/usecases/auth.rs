//! Authentication use-cases: login, registration, token refresh and the
//! role check run in front of protected routes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::{NewUser, Role, User};
use crate::error::AppError;
use crate::repositories::UserRepository;
use crate::usecases::{AddUser, UseCase, UseCaseResponse};
use crate::utils::jwt::{JwtService, TokenPair};
use crate::utils::password::PasswordHasher;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// User plus a freshly issued token pair.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthPayload {
    pub user: User,
    pub token: TokenPair,
}

fn issue_tokens(jwt: &JwtService, user: User) -> Result<AuthPayload, AppError> {
    let token = jwt.generate_token_pair(&user)?;
    Ok(AuthPayload { user, token })
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct LoginInput {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

pub struct Login {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    jwt: Arc<JwtService>,
}

impl Login {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self { users, hasher, jwt }
    }
}

#[async_trait]
impl UseCase for Login {
    type Input = LoginInput;
    type Output = AuthPayload;

    async fn execute(&self, input: LoginInput) -> UseCaseResponse<AuthPayload> {
        const INTERNAL: &str = "An unexpected error occurred during login.";

        if let Err(e) = input.validate() {
            return UseCaseResponse::from_error(e.into(), INTERNAL);
        }

        let user = match self.users.find_by_email(&input.email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::debug!("Login attempt for unknown email");
                return UseCaseResponse::unauthorized(INVALID_CREDENTIALS);
            }
            Err(e) => return UseCaseResponse::from_error(e, INTERNAL),
        };

        match self.hasher.verify(&input.password, user.password_hash()).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(user_id = %user.id(), "Login attempt with wrong password");
                return UseCaseResponse::unauthorized(INVALID_CREDENTIALS);
            }
            Err(e) => return UseCaseResponse::from_error(e, INTERNAL),
        }

        match issue_tokens(&self.jwt, user) {
            Ok(payload) => {
                tracing::info!(user_id = %payload.user.id(), "User logged in");
                UseCaseResponse::ok(payload)
            }
            Err(e) => UseCaseResponse::from_error(e, INTERNAL),
        }
    }
}

/// Creates the account through [`AddUser`] and signs the caller in.
pub struct Register {
    add_user: Arc<AddUser>,
    jwt: Arc<JwtService>,
}

impl Register {
    pub fn new(add_user: Arc<AddUser>, jwt: Arc<JwtService>) -> Self {
        Self { add_user, jwt }
    }
}

#[async_trait]
impl UseCase for Register {
    type Input = NewUser;
    type Output = AuthPayload;

    async fn execute(&self, input: NewUser) -> UseCaseResponse<AuthPayload> {
        let created = self.add_user.execute(input).await;
        let Some(user) = created.data.clone().filter(|_| created.success) else {
            return created.cast();
        };

        match issue_tokens(&self.jwt, user) {
            Ok(payload) => UseCaseResponse::created(payload),
            Err(e) => UseCaseResponse::from_error(e, "Failed to register user"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CheckAuthInput {
    /// Bearer token taken from the `Authorization` header
    pub token: Option<String>,
    pub role: Role,
}

impl CheckAuthInput {
    pub fn new(token: Option<String>, role: Role) -> Self {
        Self { token, role }
    }
}

/// Resolves a bearer token to a user holding exactly the expected role.
pub struct CheckAuth {
    users: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
}

impl CheckAuth {
    pub fn new(users: Arc<dyn UserRepository>, jwt: Arc<JwtService>) -> Self {
        Self { users, jwt }
    }
}

#[async_trait]
impl UseCase for CheckAuth {
    type Input = CheckAuthInput;
    type Output = User;

    async fn execute(&self, input: CheckAuthInput) -> UseCaseResponse<User> {
        let Some(token) = input.token.filter(|t| !t.trim().is_empty()) else {
            return UseCaseResponse::validation("Access token is required");
        };

        let claims = match self.jwt.validate_access_token(&token) {
            Ok(claims) => claims,
            Err(e) => return UseCaseResponse::from_error(e, "Authentication failed"),
        };

        let user = match self.users.find_by_id(&claims.sub).await {
            Ok(Some(user)) => user,
            Ok(None) => return UseCaseResponse::unauthorized("User not found"),
            Err(e) => return UseCaseResponse::from_error(e, "Authentication failed"),
        };

        if user.role() != input.role {
            tracing::debug!(
                user_id = %user.id(),
                role = %user.role(),
                expected = %input.role,
                "Role check failed"
            );
            return UseCaseResponse::unauthorized("User role does not match");
        }

        UseCaseResponse::ok(user)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenInput {
    #[serde(default)]
    #[validate(
        required(message = "Refresh token is required"),
        length(min = 1, message = "Refresh token is required")
    )]
    pub refresh_token: Option<String>,
}

/// Exchanges a valid refresh token for a new token pair.
pub struct RefreshToken {
    users: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
}

impl RefreshToken {
    pub fn new(users: Arc<dyn UserRepository>, jwt: Arc<JwtService>) -> Self {
        Self { users, jwt }
    }
}

#[async_trait]
impl UseCase for RefreshToken {
    type Input = RefreshTokenInput;
    type Output = AuthPayload;

    async fn execute(&self, input: RefreshTokenInput) -> UseCaseResponse<AuthPayload> {
        const INTERNAL: &str = "Failed to refresh token";

        if let Err(e) = input.validate() {
            return UseCaseResponse::from_error(e.into(), INTERNAL);
        }
        let token = input.refresh_token.unwrap_or_default();

        let claims = match self.jwt.validate_refresh_token(&token) {
            Ok(claims) => claims,
            Err(e) => return UseCaseResponse::from_error(e, INTERNAL),
        };

        let user = match self.users.find_by_id(&claims.sub).await {
            Ok(Some(user)) => user,
            Ok(None) => return UseCaseResponse::unauthorized("User not found"),
            Err(e) => return UseCaseResponse::from_error(e, INTERNAL),
        };

        match issue_tokens(&self.jwt, user) {
            Ok(payload) => UseCaseResponse::ok(payload),
            Err(e) => UseCaseResponse::from_error(e, INTERNAL),
        }
    }
}
