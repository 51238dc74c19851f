//! PostgreSQL user repository.
//!
//! Email and name uniqueness come from the `users_email_key` and
//! `users_name_key` constraints; violations surface as `Duplicate` through
//! the diesel error converter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::entities::User;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::UserRecord;
use crate::repositories::{Repository, UserRepository, sql_window};
use crate::schema::users;

/// User repository holding an async connection pool.
///
/// `AsyncDbPool` is reference counted internally, so cloning is cheap.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: AsyncDbPool,
}

impl PgUserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

fn into_users(records: Vec<UserRecord>) -> AppResult<Vec<User>> {
    records.into_iter().map(User::try_from).collect()
}

#[async_trait]
impl Repository<User> for PgUserRepository {
    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<User>> {
        let mut conn = self.pool.get().await?;

        users::table
            .find(user_id)
            .select(UserRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let mut conn = self.pool.get().await?;

        let records = users::table
            .order((users::created_at.asc(), users::id.asc()))
            .select(UserRecord::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;
        into_users(records)
    }

    async fn find_page(&self, offset: usize, limit: usize) -> AppResult<(Vec<User>, usize)> {
        let mut conn = self.pool.get().await?;

        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)?;
        let Some((offset, limit)) = sql_window(offset, limit) else {
            return Ok((Vec::new(), total as usize));
        };
        let records = users::table
            .order((users::created_at.asc(), users::id.asc()))
            .offset(offset)
            .limit(limit)
            .select(UserRecord::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok((into_users(records)?, total as usize))
    }

    async fn add(&self, user: User) -> AppResult<User> {
        let mut conn = self.pool.get().await?;

        let record = diesel::insert_into(users::table)
            .values(UserRecord::from(&user))
            .returning(UserRecord::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert user"))?;
        User::try_from(record)
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut conn = self.pool.get().await?;

        let record = diesel::update(users::table.find(user.id()))
            .set(UserRecord::from(&user))
            .returning(UserRecord::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update user"))?
            .ok_or_else(|| AppError::not_found("User", "id", user.id()))?;
        User::try_from(record)
    }

    async fn delete(&self, user_id: &str) -> AppResult<()> {
        let mut conn = self.pool.get().await?;

        let affected = diesel::delete(users::table.find(user_id))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)?;
        if affected == 0 {
            return Err(AppError::not_found("User", "id", user_id));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, user_email: &str) -> AppResult<Option<User>> {
        let mut conn = self.pool.get().await?;

        users::table
            .filter(users::email.eq(user_email.trim().to_lowercase()))
            .select(UserRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_name(&self, user_name: &str) -> AppResult<Option<User>> {
        let mut conn = self.pool.get().await?;

        users::table
            .filter(users::name.eq(user_name))
            .select(UserRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)?
            .map(User::try_from)
            .transpose()
    }
}
