use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::entities::{Post, PostProps};
use crate::error::{AppError, AppResult};

/// Row of the `posts` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Post> for PostRecord {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id().to_string(),
            title: post.title().to_string(),
            content: post.content().to_string(),
            user_id: post.user_id().to_string(),
            created_at: post.created_at(),
            updated_at: post.updated_at(),
        }
    }
}

impl TryFrom<PostRecord> for Post {
    type Error = AppError;

    fn try_from(record: PostRecord) -> AppResult<Self> {
        Post::hydrate(PostProps {
            id: record.id,
            title: record.title,
            content: record.content,
            user_id: record.user_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}
