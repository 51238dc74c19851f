//! Row types for the PostgreSQL backend.

mod post;
mod user;

pub use post::PostRecord;
pub use user::UserRecord;
