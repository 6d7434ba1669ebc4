//! Follow graph service.
//!
//! Implements [`FollowGraph`]. Existence, edge-state and self-follow rules
//! are all evaluated before failing. Storage enforces pair uniqueness, so a
//! concurrent duplicate follow loses at insert time and is reported the same
//! way as one caught by the existence check.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{FollowGraph, FollowRepository, FollowRepositoryError, UserRepository};
use crate::domain::user_service::map_user_error;
use crate::domain::{
    Actor, Error, FollowAction, FollowEdge, User, UserId, UserSummary, Username,
};

fn summaries(users: Result<Vec<User>, FollowRepositoryError>) -> Result<Vec<UserSummary>, Error> {
    Ok(users
        .map_err(map_follow_error)?
        .iter()
        .map(User::summary)
        .collect())
}

pub(crate) fn map_follow_error(error: FollowRepositoryError) -> Error {
    if let Some(mapped) = error.store_failure() {
        return mapped;
    }
    match error {
        FollowRepositoryError::Duplicate => Error::validation(vec![
            FollowAction::Follow.edge_state_message().to_owned(),
        ]),
        other => Error::internal(other.to_string()),
    }
}

/// Follow graph service implementing the [`FollowGraph`] driving port.
#[derive(Clone)]
pub struct FollowGraphService<U, F> {
    users: Arc<U>,
    follows: Arc<F>,
}

impl<U, F> FollowGraphService<U, F> {
    /// Create a new service over the user and follow repositories.
    pub fn new(users: Arc<U>, follows: Arc<F>) -> Self {
        Self { users, follows }
    }
}

impl<U, F> FollowGraphService<U, F>
where
    U: UserRepository,
    F: FollowRepository,
{
    async fn resolve_target(&self, target_username: &str) -> Result<Option<UserId>, Error> {
        let Some(username) = Username::exact(target_username) else {
            return Ok(None);
        };
        Ok(self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_user_error)?
            .map(|user| user.id()))
    }

    /// Run every rule for `action` and return the edge to mutate.
    async fn checked_edge(
        &self,
        action: FollowAction,
        actor: UserId,
        target_username: &str,
    ) -> Result<FollowEdge, Error> {
        let target = self.resolve_target(target_username).await?;
        let edge_exists = match target {
            Some(target) => self
                .follows
                .exists(&FollowEdge::new(actor, target))
                .await
                .map_err(map_follow_error)?,
            None => false,
        };

        let errors = action.violations(actor, target, edge_exists);
        match target {
            Some(target) if errors.is_empty() => Ok(FollowEdge::new(actor, target)),
            _ => {
                debug!(?action, violations = errors.len(), "follow change rejected");
                Err(Error::validation(errors))
            }
        }
    }
}

#[async_trait]
impl<U, F> FollowGraph for FollowGraphService<U, F>
where
    U: UserRepository,
    F: FollowRepository,
{
    async fn follow(&self, actor: UserId, target_username: &str) -> Result<(), Error> {
        let edge = self
            .checked_edge(FollowAction::Follow, actor, target_username)
            .await?;
        self.follows.insert(&edge).await.map_err(map_follow_error)
    }

    async fn unfollow(&self, actor: UserId, target_username: &str) -> Result<(), Error> {
        let action = FollowAction::Unfollow;
        let edge = self.checked_edge(action, actor, target_username).await?;
        let removed = self.follows.delete(&edge).await.map_err(map_follow_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::validation(vec![
                action.edge_state_message().to_owned(),
            ]))
        }
    }

    async fn is_following(&self, target: UserId, actor: Actor) -> Result<bool, Error> {
        let Some(actor) = actor.user_id() else {
            return Ok(false);
        };
        self.follows
            .exists(&FollowEdge::new(actor, target))
            .await
            .map_err(map_follow_error)
    }

    async fn followers(&self, user: UserId) -> Result<Vec<UserSummary>, Error> {
        summaries(self.follows.followers_of(&user).await)
    }

    async fn following(&self, user: UserId) -> Result<Vec<UserSummary>, Error> {
        summaries(self.follows.following_of(&user).await)
    }

    async fn follower_count(&self, user: UserId) -> Result<u64, Error> {
        self.follows
            .follower_count(&user)
            .await
            .map_err(map_follow_error)
    }

    async fn following_count(&self, user: UserId) -> Result<u64, Error> {
        self.follows
            .following_count(&user)
            .await
            .map_err(map_follow_error)
    }
}

#[cfg(test)]
#[path = "follow_service_tests.rs"]
mod tests;
