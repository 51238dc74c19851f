//! Domain entities.
//!
//! Entities are only constructed through their factories (`create`,
//! `hydrate`) or derived from an existing value (`apply`), and each of
//! those paths validates the final shape. Fields are private so an invalid
//! instance cannot be assembled by hand.

mod post;
mod user;

pub use post::{NewPost, Post, PostChanges, PostProps};
pub use user::{NewUser, Role, User, UserChanges, UserProps};

use serde::Serialize;

/// Capabilities shared by every stored entity.
pub trait Entity: Clone + Serialize + Send + Sync + 'static {
    /// Human readable entity name used in messages ("User", "Post").
    const NAME: &'static str;

    fn id(&self) -> &str;

    /// `(field, value)` pairs that must be unique across the collection.
    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}
