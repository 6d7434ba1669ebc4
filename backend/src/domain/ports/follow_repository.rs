//! Driven port for follow edge persistence.
//!
//! Edges are keyed by the `(follower, following)` pair; adapters must reject
//! a second insert of the same pair atomically with
//! [`FollowRepositoryError::Duplicate`] instead of relying on a prior
//! existence check.

use async_trait::async_trait;

use crate::domain::{FollowEdge, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by follow repository adapters.
    pub enum FollowRepositoryError for "follow repository" {
        /// The edge already exists.
        Duplicate => "follow edge already exists",
    }
}

/// Storage for directed follow edges.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Insert an edge.
    async fn insert(&self, edge: &FollowEdge) -> Result<(), FollowRepositoryError>;

    /// Remove an edge, returning whether one was deleted.
    async fn delete(&self, edge: &FollowEdge) -> Result<bool, FollowRepositoryError>;

    /// True when the edge exists.
    async fn exists(&self, edge: &FollowEdge) -> Result<bool, FollowRepositoryError>;

    /// Users following `user`, in storage order.
    async fn followers_of(&self, user: &UserId) -> Result<Vec<User>, FollowRepositoryError>;

    /// Users that `user` follows, in storage order.
    async fn following_of(&self, user: &UserId) -> Result<Vec<User>, FollowRepositoryError>;

    /// Ids of the users that `user` follows.
    async fn following_ids(&self, user: &UserId) -> Result<Vec<UserId>, FollowRepositoryError>;

    /// Number of users following `user`.
    async fn follower_count(&self, user: &UserId) -> Result<u64, FollowRepositoryError>;

    /// Number of users `user` follows.
    async fn following_count(&self, user: &UserId) -> Result<u64, FollowRepositoryError>;
}
