//! Driving port for posts, search and feeds.
//!
//! Post ids arrive as raw strings so that malformed identifiers follow the
//! same not-found and not-allowed paths as unknown ones.

use async_trait::async_trait;

use crate::domain::{Actor, Error, PostId, PostView, UpdateOutcome, UserId};

/// Use-cases exposed to inbound adapters for posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Sanitise, validate and persist a post authored by `actor`.
    async fn create(&self, actor: UserId, title: &str, body: &str) -> Result<PostId, Error>;

    /// Load a post enriched for `viewer`; malformed or unknown ids are not
    /// found.
    async fn find_by_id(&self, post_id: &str, viewer: Actor) -> Result<PostView, Error>;

    /// Replace title and body of a post owned by `actor`.
    ///
    /// Missing and foreign posts fail with the same authorisation error;
    /// invalid content yields [`UpdateOutcome::Failure`].
    async fn update(
        &self,
        actor: UserId,
        post_id: &str,
        title: &str,
        body: &str,
    ) -> Result<UpdateOutcome, Error>;

    /// Delete a post owned by `actor`.
    async fn delete(&self, actor: UserId, post_id: &str) -> Result<(), Error>;

    /// Full-text search, most relevant first. Blank terms are rejected.
    async fn search(&self, term: &str, viewer: Actor) -> Result<Vec<PostView>, Error>;

    /// Posts by `author`, newest first.
    async fn find_by_author(&self, author: UserId, viewer: Actor) -> Result<Vec<PostView>, Error>;

    /// Posts by the user named `username`, newest first.
    async fn find_by_username(&self, username: &str, viewer: Actor)
    -> Result<Vec<PostView>, Error>;

    /// Posts by everyone `actor` follows, newest first.
    async fn feed_for(&self, actor: UserId) -> Result<Vec<PostView>, Error>;

    /// Number of posts written by `author`.
    async fn count_by_author(&self, author: UserId) -> Result<u64, Error>;
}
