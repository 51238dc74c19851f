use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::Entity;
use crate::error::{AppError, AppResult};
use crate::utils::password::PasswordHasher;

/// Authorization role carried by every user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(AppError::validation("role", ROLE_MESSAGE)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ROLE_MESSAGE: &str = "Role must be either admin or user";

fn validate_role(role: &str) -> Result<(), ValidationError> {
    role.parse::<Role>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("role"))
}

fn parse_role(role: Option<&str>) -> AppResult<Option<Role>> {
    role.map(str::parse).transpose()
}

/// A registered account. `password_hash` is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[validate(length(min = 1, message = "Id is required"))]
    id: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters long")
    )]
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, max = 255, message = "Name must be between 3 and 255 characters long"))]
    name: Option<String>,
    role: Role,
    #[serde(skip_serializing)]
    #[validate(length(min = 1, message = "Password hash is required"))]
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Persisted shape of a user, as read back from storage.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProps {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation input. Missing fields deserialize to empty values so they are
/// reported by validation rather than by the JSON decoder.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters long")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 3, max = 255, message = "Name must be between 3 and 255 characters long"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[serde(default)]
    #[validate(custom(function = "validate_role", message = "Role must be either admin or user"))]
    pub role: Option<String>,
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserChanges {
    #[serde(default)]
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters long")
    )]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(min = 3, max = 255, message = "Name must be between 3 and 255 characters long"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_role", message = "Role must be either admin or user"))]
    pub role: Option<String>,
}

impl User {
    /// Validates the input, hashes the password and stamps a fresh id and
    /// timestamps. The email is stored lower-cased.
    pub async fn create(input: NewUser, hasher: &dyn PasswordHasher) -> AppResult<Self> {
        input.validate()?;
        let role = parse_role(input.role.as_deref())?.unwrap_or_default();
        let password_hash = hasher.hash(&input.password).await?;
        let now = Utc::now();

        let user = Self {
            id: Uuid::now_v7().to_string(),
            email: normalize_email(&input.email),
            name: input.name,
            role,
            password_hash,
            created_at: now,
            updated_at: now,
        };
        user.validate()?;
        Ok(user)
    }

    /// Rebuilds a user from stored data, keeping its id and timestamps.
    pub fn hydrate(props: UserProps) -> AppResult<Self> {
        let user = Self {
            id: props.id,
            email: props.email,
            name: props.name,
            role: props.role,
            password_hash: props.password_hash,
            created_at: props.created_at,
            updated_at: props.updated_at,
        };
        user.validate()?;
        Ok(user)
    }

    /// Returns an updated copy with `updated_at` bumped. The receiver is left
    /// untouched, so a failed validation never leaks a half-applied change.
    pub async fn apply(&self, changes: UserChanges, hasher: &dyn PasswordHasher) -> AppResult<Self> {
        changes.validate()?;

        let mut next = self.clone();
        if let Some(email) = changes.email {
            next.email = normalize_email(&email);
        }
        if let Some(name) = changes.name {
            next.name = Some(name);
        }
        if let Some(role) = parse_role(changes.role.as_deref())? {
            next.role = role;
        }
        if let Some(password) = changes.password {
            next.password_hash = hasher.hash(&password).await?;
        }
        next.updated_at = Utc::now().max(self.updated_at);
        next.validate()?;
        Ok(next)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn into_props(self) -> UserProps {
        UserProps {
            id: self.id,
            email: self.email,
            name: self.name,
            role: self.role,
            password_hash: self.password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Entity for User {
    const NAME: &'static str = "User";

    fn id(&self) -> &str {
        User::id(self)
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        let mut keys = vec![("email", self.email.clone())];
        if let Some(name) = &self.name {
            keys.push(("name", name.clone()));
        }
        keys
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
