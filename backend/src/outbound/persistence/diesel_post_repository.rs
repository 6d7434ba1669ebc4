//! PostgreSQL-backed [`PostRepository`].
//!
//! Reads join `users` so every post carries its author's current username
//! and email. Full-text search runs over the generated `search_document`
//! column with `websearch_to_tsquery`, ranked by `ts_rank`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{AuthoredPost, Post, PostContent, PostId, SearchTerm, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{PostContentUpdate, PostRow, SearchHitRow, UserRow, row_count};
use super::pool::{DbPool, PoolError};
use super::schema::{posts, users};

const SEARCH_SQL: &str = "\
    SELECT p.id, p.title, p.body, p.created_date, p.author_id, \
           u.username AS author_username, u.email AS author_email \
    FROM posts p \
    JOIN users u ON u.id = p.author_id, \
         websearch_to_tsquery('english', $1) AS query \
    WHERE p.search_document @@ query \
    ORDER BY ts_rank(p.search_document, query) DESC, p.created_date DESC";

/// Diesel implementation of [`PostRepository`].
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostRepositoryError {
    map_basic_pool_error(error, PostRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PostRepositoryError {
    map_basic_diesel_error(
        error,
        PostRepositoryError::query,
        PostRepositoryError::connection,
    )
}

fn authored(rows: Vec<(PostRow, UserRow)>) -> Vec<AuthoredPost> {
    rows.into_iter()
        .map(|(post, author)| post.with_author(author))
        .collect()
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(posts::table)
            .values(&PostRow::from_post(post))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<AuthoredPost>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(PostRow, UserRow)> = posts::table
            .inner_join(users::table)
            .filter(posts::id.eq(*id.as_uuid()))
            .select((PostRow::as_select(), UserRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|(post, author)| post.with_author(author)))
    }

    async fn update_content(
        &self,
        id: &PostId,
        content: &PostContent,
    ) -> Result<bool, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = PostContentUpdate {
            title: content.title(),
            body: content.body(),
        };
        let updated = diesel::update(posts::table.find(*id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(posts::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn search(&self, term: &SearchTerm) -> Result<Vec<AuthoredPost>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let hits: Vec<SearchHitRow> = diesel::sql_query(SEARCH_SQL)
            .bind::<Text, _>(term.as_ref().to_owned())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(hits.into_iter().map(SearchHitRow::into_authored).collect())
    }

    async fn find_by_authors(
        &self,
        authors: &[UserId],
    ) -> Result<Vec<AuthoredPost>, PostRepositoryError> {
        let author_ids: Vec<Uuid> = authors.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(PostRow, UserRow)> = posts::table
            .inner_join(users::table)
            .filter(posts::author_id.eq_any(author_ids))
            .order((posts::created_date.desc(), posts::id.asc()))
            .select((PostRow::as_select(), UserRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(authored(rows))
    }

    async fn count_by_author(&self, author: &UserId) -> Result<u64, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = posts::table
            .filter(posts::author_id.eq(*author.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row_count(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use diesel::result::Error as DieselError;
    use rstest::rstest;

    #[rstest]
    fn search_query_ranks_by_relevance() {
        assert!(SEARCH_SQL.contains("websearch_to_tsquery('english', $1)"));
        assert!(SEARCH_SQL.contains("ORDER BY ts_rank(p.search_document, query) DESC"));
    }

    #[rstest]
    fn missing_rows_are_query_errors() {
        assert!(matches!(
            map_diesel_error(DieselError::NotFound),
            PostRepositoryError::Query { .. }
        ));
    }

    #[rstest]
    fn joined_rows_keep_the_author() {
        let author = UserRow {
            id: Uuid::new_v4(),
            username: "ada".to_owned(),
            email: "ada@example.com".to_owned(),
        };
        let created = Utc
            .with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
            .single()
            .expect("timestamp");
        let post = PostRow {
            id: Uuid::new_v4(),
            title: "Title".to_owned(),
            body: "Body".to_owned(),
            created_date: created,
            author_id: author.id,
        };

        let posts = authored(vec![(post, author)]);

        let [only] = posts.as_slice() else {
            panic!("expected one post");
        };
        assert_eq!(only.author.username().as_ref(), "ada");
        assert_eq!(only.post.author, only.author.id());
        assert_eq!(only.post.content.title(), "Title");
        assert_eq!(only.post.created_date, created);
    }
}
