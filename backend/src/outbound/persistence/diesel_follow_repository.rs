//! PostgreSQL-backed [`FollowRepository`].
//!
//! The `follows` primary key rejects duplicate pairs, so a follow that races
//! another for the same pair fails with
//! [`FollowRepositoryError::Duplicate`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{FollowRepository, FollowRepositoryError};
use crate::domain::{FollowEdge, User, UserId};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{NewFollowRow, UserRow, row_count};
use super::pool::{DbPool, PoolError};
use super::schema::{follows, users};

/// Diesel implementation of [`FollowRepository`].
#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FollowRepositoryError {
    map_basic_pool_error(error, FollowRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FollowRepositoryError {
    if unique_violation(&error).is_some() {
        return FollowRepositoryError::duplicate();
    }
    map_basic_diesel_error(
        error,
        FollowRepositoryError::query,
        FollowRepositoryError::connection,
    )
}

fn edge_key(edge: &FollowEdge) -> (Uuid, Uuid) {
    (*edge.follower.as_uuid(), *edge.following.as_uuid())
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn insert(&self, edge: &FollowEdge) -> Result<(), FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (follower_id, following_id) = edge_key(edge);
        diesel::insert_into(follows::table)
            .values(&NewFollowRow {
                follower_id,
                following_id,
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, edge: &FollowEdge) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(follows::table.find(edge_key(edge)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn exists(&self, edge: &FollowEdge) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(follows::table.find(edge_key(edge))))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn followers_of(&self, user: &UserId) -> Result<Vec<User>, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = follows::table
            .inner_join(users::table.on(users::id.eq(follows::follower_id)))
            .filter(follows::following_id.eq(*user.as_uuid()))
            .order(follows::created_at.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    async fn following_of(&self, user: &UserId) -> Result<Vec<User>, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = follows::table
            .inner_join(users::table.on(users::id.eq(follows::following_id)))
            .filter(follows::follower_id.eq(*user.as_uuid()))
            .order(follows::created_at.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    async fn following_ids(&self, user: &UserId) -> Result<Vec<UserId>, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<Uuid> = follows::table
            .filter(follows::follower_id.eq(*user.as_uuid()))
            .select(follows::following_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }

    async fn follower_count(&self, user: &UserId) -> Result<u64, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = follows::table
            .filter(follows::following_id.eq(*user.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row_count(count))
    }

    async fn following_count(&self, user: &UserId) -> Result<u64, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = follows::table
            .filter(follows::follower_id.eq(*user.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row_count(count))
    }
}
