//! Middleware for request IDs, logging, error shaping and role checks.

mod auth;
mod error_handler;
mod logging;
mod request_id;

pub use auth::{AuthUser, require_admin, require_user};
pub use error_handler::{global_error_handler, not_found_fallback};
pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
