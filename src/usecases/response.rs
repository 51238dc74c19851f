//! Uniform result envelope returned by every use-case.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuccessType {
    Ok,
    Created,
    NoContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    Validation,
    NotFound,
    Unauthorized,
    Forbidden,
    Internal,
    Conflict,
}

/// Serialized as the bare tag, e.g. `"CREATED"` or `"NOT_FOUND"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ResponseType {
    Success(SuccessType),
    Error(ErrorType),
}

impl ResponseType {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ResponseType::Success(SuccessType::Ok) => StatusCode::OK,
            ResponseType::Success(SuccessType::Created) => StatusCode::CREATED,
            ResponseType::Success(SuccessType::NoContent) => StatusCode::NO_CONTENT,
            ResponseType::Error(ErrorType::Validation) => StatusCode::BAD_REQUEST,
            ResponseType::Error(ErrorType::NotFound) => StatusCode::NOT_FOUND,
            ResponseType::Error(ErrorType::Unauthorized) => StatusCode::UNAUTHORIZED,
            ResponseType::Error(ErrorType::Forbidden) => StatusCode::FORBIDDEN,
            ResponseType::Error(ErrorType::Conflict) => StatusCode::CONFLICT,
            ResponseType::Error(ErrorType::Internal) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SuccessType> for ResponseType {
    fn from(kind: SuccessType) -> Self {
        ResponseType::Success(kind)
    }
}

impl From<ErrorType> for ResponseType {
    fn from(kind: ErrorType) -> Self {
        ResponseType::Error(kind)
    }
}

/// Page metadata attached to paginated list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

impl Pagination {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UseCaseResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ResponseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> UseCaseResponse<T> {
    pub fn success(data: T, message: impl Into<String>, kind: SuccessType) -> Self {
        Self {
            success: true,
            message: message.into(),
            kind: kind.into(),
            data: Some(data),
            error: None,
            pagination: None,
        }
    }

    pub fn ok(data: T) -> Self {
        Self::success(data, "Operation completed successfully", SuccessType::Ok)
    }

    pub fn created(data: T) -> Self {
        Self::success(data, "Resource created successfully", SuccessType::Created)
    }

    pub fn no_content() -> Self {
        Self {
            success: true,
            message: "Operation successful, no content to return".to_string(),
            kind: SuccessType::NoContent.into(),
            data: None,
            error: None,
            pagination: None,
        }
    }

    pub fn failure(message: impl Into<String>, kind: ErrorType) -> Self {
        Self {
            success: false,
            message: message.into(),
            kind: kind.into(),
            data: None,
            error: None,
            pagination: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::failure(message, ErrorType::Validation)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::failure(message, ErrorType::NotFound)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::failure(message, ErrorType::Unauthorized)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::failure(message, ErrorType::Forbidden)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::failure(message, ErrorType::Conflict)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::failure(message, ErrorType::Internal)
    }

    /// Maps an error to its envelope. Server-side errors are logged and
    /// answered with `internal_message` so no details leak to the client.
    pub fn from_error(error: AppError, internal_message: &str) -> Self {
        match error {
            AppError::Validation { .. }
            | AppError::ValidationErrors { .. }
            | AppError::BadRequest { .. } => Self::validation(error.to_string()),
            AppError::NotFound { .. } => Self::not_found(error.to_string()),
            AppError::Duplicate { .. } => Self::conflict(error.to_string()),
            AppError::Unauthorized { .. } => Self::unauthorized(error.to_string()),
            AppError::Forbidden { .. } => Self::forbidden(error.to_string()),
            AppError::Database { .. }
            | AppError::Configuration { .. }
            | AppError::ConnectionPool { .. }
            | AppError::Internal { .. } => {
                tracing::error!(error = ?error, "{}", internal_message);
                Self::internal(internal_message)
            }
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Re-types a failure so it can be forwarded by another use-case.
    /// The payload of a success is dropped.
    pub fn cast<U>(self) -> UseCaseResponse<U> {
        UseCaseResponse {
            success: self.success,
            message: self.message,
            kind: self.kind,
            data: None,
            error: self.error,
            pagination: self.pagination,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }
}

impl<T: Serialize> IntoResponse for UseCaseResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::NO_CONTENT {
            return status.into_response();
        }
        (status, Json(self)).into_response()
    }
}
