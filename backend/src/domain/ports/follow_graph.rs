//! Driving port for the follow graph.

use async_trait::async_trait;

use crate::domain::{Actor, Error, UserId, UserSummary};

/// Use-cases exposed to inbound adapters for follow edges.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowGraph: Send + Sync {
    /// Follow the user named `target_username`.
    ///
    /// Fails with a validation error collecting every violated rule.
    async fn follow(&self, actor: UserId, target_username: &str) -> Result<(), Error>;

    /// Stop following the user named `target_username`.
    async fn unfollow(&self, actor: UserId, target_username: &str) -> Result<(), Error>;

    /// True when `actor` follows `target`. Anonymous actors follow nobody.
    async fn is_following(&self, target: UserId, actor: Actor) -> Result<bool, Error>;

    /// Users following `user`.
    async fn followers(&self, user: UserId) -> Result<Vec<UserSummary>, Error>;

    /// Users that `user` follows.
    async fn following(&self, user: UserId) -> Result<Vec<UserSummary>, Error>;

    /// Number of users following `user`.
    async fn follower_count(&self, user: UserId) -> Result<u64, Error>;

    /// Number of users `user` follows.
    async fn following_count(&self, user: UserId) -> Result<u64, Error>;
}
