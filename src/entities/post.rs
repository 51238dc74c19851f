use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::entities::Entity;
use crate::error::AppResult;

/// A post authored by a user. `user_id` is a plain reference; the storage
/// layer does not enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[validate(length(min = 1, message = "Id is required"))]
    id: String,
    #[validate(length(min = 3, message = "Title must be at least 3 characters long"))]
    title: String,
    #[validate(length(min = 3, message = "Content must be at least 3 characters long"))]
    content: String,
    #[validate(length(min = 1, max = 36, message = "User id must be between 1 and 36 characters long"))]
    user_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostProps {
    pub id: String,
    pub title: String,
    pub content: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    #[serde(default)]
    #[validate(length(min = 3, message = "Title must be at least 3 characters long"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 3, message = "Content must be at least 3 characters long"))]
    pub content: String,
    #[serde(default)]
    #[validate(
        required(message = "User id is required"),
        length(min = 1, max = 36, message = "User id must be between 1 and 36 characters long")
    )]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostChanges {
    #[serde(default)]
    #[validate(length(min = 3, message = "Title must be at least 3 characters long"))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 3, message = "Content must be at least 3 characters long"))]
    pub content: Option<String>,
}

impl Post {
    pub fn create(input: NewPost) -> AppResult<Self> {
        input.validate()?;
        let now = Utc::now();

        let post = Self {
            id: Uuid::now_v7().to_string(),
            title: input.title,
            content: input.content,
            user_id: input.user_id.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        post.validate()?;
        Ok(post)
    }

    pub fn hydrate(props: PostProps) -> AppResult<Self> {
        let post = Self {
            id: props.id,
            title: props.title,
            content: props.content,
            user_id: props.user_id,
            created_at: props.created_at,
            updated_at: props.updated_at,
        };
        post.validate()?;
        Ok(post)
    }

    pub fn apply(&self, changes: PostChanges) -> AppResult<Self> {
        changes.validate()?;

        let mut next = self.clone();
        if let Some(title) = changes.title {
            next.title = title;
        }
        if let Some(content) = changes.content {
            next.content = content;
        }
        next.updated_at = Utc::now().max(self.updated_at);
        next.validate()?;
        Ok(next)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn into_props(self) -> PostProps {
        PostProps {
            id: self.id,
            title: self.title,
            content: self.content,
            user_id: self.user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Entity for Post {
    const NAME: &'static str = "Post";

    fn id(&self) -> &str {
        Post::id(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn new_post(title: &str, content: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: content.to_string(),
            user_id: Some("author-1".to_string()),
        }
    }

    #[test]
    fn test_create_post() {
        let post = Post::create(new_post("Hello", "World!")).unwrap();

        assert!(Uuid::parse_str(post.id()).is_ok());
        assert_eq!(post.title(), "Hello");
        assert_eq!(post.user_id(), "author-1");
    }

    #[test]
    fn test_create_reports_every_failing_field() {
        let err = Post::create(new_post("Hi", "")).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Content must be at least 3 characters long, Title must be at least 3 characters long"
        );
    }

    #[test]
    fn test_create_requires_author() {
        let mut input = new_post("Hello", "World!");
        input.user_id = None;

        match Post::create(input) {
            Err(AppError::ValidationErrors { errors }) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "user_id");
            }
            other => panic!("Expected ValidationErrors, got: {:?}", other),
        }
    }

    #[test]
    fn test_create_rejects_oversized_author_id() {
        let mut input = new_post("Hello", "World!");
        input.user_id = Some("u".repeat(40));

        let err = Post::create(input).unwrap_err();
        assert_eq!(err.to_string(), "User id must be between 1 and 36 characters long");
    }

    #[test]
    fn test_json_uses_camel_case() {
        let post = Post::create(new_post("Hello", "World!")).unwrap();
        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(json["userId"], "author-1");
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_hydrate_round_trip() {
        let post = Post::create(new_post("Hello", "World!")).unwrap();
        let props: PostProps = serde_json::from_value(serde_json::to_value(&post).unwrap()).unwrap();

        assert_eq!(Post::hydrate(props).unwrap(), post);
    }

    #[test]
    fn test_apply_keeps_identity() {
        let post = Post::create(new_post("Hello", "World!")).unwrap();
        let updated = post
            .apply(PostChanges {
                title: Some("Updated".to_string()),
                content: None,
            })
            .unwrap();

        assert_eq!(updated.id(), post.id());
        assert_eq!(updated.title(), "Updated");
        assert_eq!(updated.content(), "World!");
        assert!(post.apply(PostChanges { title: Some("x".into()), content: None }).is_err());
    }
}
