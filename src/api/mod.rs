//! HTTP layer: extractors, middleware, handlers and routing.
//!
//! Handlers stay thin. Each one extracts its input and hands it to a
//! use-case, whose envelope is the response.

pub mod doc;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use routes::create_router;
