use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::entities::Post;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::PostRecord;
use crate::repositories::{PostRepository, Repository, sql_window};
use crate::schema::posts;

/// PostgreSQL post repository.
#[derive(Clone)]
pub struct PgPostRepository {
    pool: AsyncDbPool,
}

impl PgPostRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

fn into_posts(records: Vec<PostRecord>) -> AppResult<Vec<Post>> {
    records.into_iter().map(Post::try_from).collect()
}

#[async_trait]
impl Repository<Post> for PgPostRepository {
    async fn find_by_id(&self, post_id: &str) -> AppResult<Option<Post>> {
        let mut conn = self.pool.get().await?;

        posts::table
            .find(post_id)
            .select(PostRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)?
            .map(Post::try_from)
            .transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<Post>> {
        let mut conn = self.pool.get().await?;

        let records = posts::table
            .order((posts::created_at.asc(), posts::id.asc()))
            .select(PostRecord::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;
        into_posts(records)
    }

    async fn find_page(&self, offset: usize, limit: usize) -> AppResult<(Vec<Post>, usize)> {
        let mut conn = self.pool.get().await?;

        let total: i64 = posts::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)?;
        let Some((offset, limit)) = sql_window(offset, limit) else {
            return Ok((Vec::new(), total as usize));
        };
        let records = posts::table
            .order((posts::created_at.asc(), posts::id.asc()))
            .offset(offset)
            .limit(limit)
            .select(PostRecord::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok((into_posts(records)?, total as usize))
    }

    async fn add(&self, post: Post) -> AppResult<Post> {
        let mut conn = self.pool.get().await?;

        let record = diesel::insert_into(posts::table)
            .values(PostRecord::from(&post))
            .returning(PostRecord::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert post"))?;
        Post::try_from(record)
    }

    async fn update(&self, post: Post) -> AppResult<Post> {
        let mut conn = self.pool.get().await?;

        let record = diesel::update(posts::table.find(post.id()))
            .set(PostRecord::from(&post))
            .returning(PostRecord::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update post"))?
            .ok_or_else(|| AppError::not_found("Post", "id", post.id()))?;
        Post::try_from(record)
    }

    async fn delete(&self, post_id: &str) -> AppResult<()> {
        let mut conn = self.pool.get().await?;

        let affected = diesel::delete(posts::table.find(post_id))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)?;
        if affected == 0 {
            return Err(AppError::not_found("Post", "id", post_id));
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn find_by_user(&self, author_id: &str) -> AppResult<Vec<Post>> {
        let mut conn = self.pool.get().await?;

        let records = posts::table
            .filter(posts::user_id.eq(author_id))
            .order((posts::created_at.asc(), posts::id.asc()))
            .select(PostRecord::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;
        into_posts(records)
    }
}
