//! Driven port for post persistence.
//!
//! Reads return [`AuthoredPost`] values joined to the author's current user
//! record, so usernames and avatars are never copied into post rows.

use async_trait::async_trait;

use crate::domain::{AuthoredPost, Post, PostContent, PostId, SearchTerm, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostRepositoryError for "post repository" {}
}

/// Storage for posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post.
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError>;

    /// Fetch a post joined to its author.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<AuthoredPost>, PostRepositoryError>;

    /// Replace title and body only; returns whether a row changed.
    async fn update_content(
        &self,
        id: &PostId,
        content: &PostContent,
    ) -> Result<bool, PostRepositoryError>;

    /// Remove a post, returning whether one was deleted.
    async fn delete(&self, id: &PostId) -> Result<bool, PostRepositoryError>;

    /// Full-text search over title and body, most relevant first.
    async fn search(&self, term: &SearchTerm) -> Result<Vec<AuthoredPost>, PostRepositoryError>;

    /// Posts written by any of `authors`, newest first.
    async fn find_by_authors(
        &self,
        authors: &[UserId],
    ) -> Result<Vec<AuthoredPost>, PostRepositoryError>;

    /// Number of posts written by `author`.
    async fn count_by_author(&self, author: &UserId) -> Result<u64, PostRepositoryError>;
}
