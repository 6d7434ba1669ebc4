//! Profile header assembly.
//!
//! Composes the user directory, follow graph and post store into the single
//! summary shown at the top of a user's page.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{FollowGraph, PostStore, ProfileQuery, ProfileSummary, UserDirectory};
use crate::domain::{Actor, Error};

/// Service implementing the [`ProfileQuery`] driving port.
#[derive(Clone)]
pub struct ProfileService<U, F, P> {
    users: Arc<U>,
    follows: Arc<F>,
    posts: Arc<P>,
}

impl<U, F, P> ProfileService<U, F, P> {
    /// Create a new service over the three use-case services.
    pub fn new(users: Arc<U>, follows: Arc<F>, posts: Arc<P>) -> Self {
        Self {
            users,
            follows,
            posts,
        }
    }
}

#[async_trait]
impl<U, F, P> ProfileQuery for ProfileService<U, F, P>
where
    U: UserDirectory,
    F: FollowGraph,
    P: PostStore,
{
    async fn profile(&self, username: &str, viewer: Actor) -> Result<ProfileSummary, Error> {
        let identity = self.users.find_by_username(username).await?;
        let id = identity.id;

        let is_following = self.follows.is_following(id, viewer).await?;
        let post_count = self.posts.count_by_author(id).await?;
        let follower_count = self.follows.follower_count(id).await?;
        let following_count = self.follows.following_count(id).await?;

        Ok(ProfileSummary {
            username: identity.username,
            avatar: identity.avatar,
            is_visitors_profile: viewer.owns(id),
            is_following,
            post_count,
            follower_count,
            following_count,
        })
    }
}
