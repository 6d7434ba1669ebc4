//! Post store service.
//!
//! Implements [`PostStore`]. Every read is enriched at read time with the
//! author's current username and avatar, and with `isOwner` for the viewer.
//! Update and delete resolve ownership first; missing posts, malformed ids
//! and foreign posts all fail with the same authorisation error.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::follow_service::map_follow_error;
use crate::domain::ports::{
    FollowRepository, PostRepository, PostRepositoryError, PostStore, UserRepository,
};
use crate::domain::user_service::{USER_NOT_FOUND, map_user_error};
use crate::domain::{
    Actor, AuthoredPost, Error, Ownership, Post, PostContent, PostId, PostView, SearchTerm,
    UpdateOutcome, UserId, Username,
};

const POST_NOT_FOUND: &str = "Post not found.";

pub(crate) fn map_post_error(error: PostRepositoryError) -> Error {
    error
        .store_failure()
        .unwrap_or_else(|| Error::internal(error.to_string()))
}

fn views(posts: Vec<AuthoredPost>, viewer: Actor) -> Vec<PostView> {
    posts
        .into_iter()
        .map(|post| post.into_view(viewer))
        .collect()
}

/// Post store service implementing the [`PostStore`] driving port.
#[derive(Clone)]
pub struct PostStoreService<P, F, U> {
    posts: Arc<P>,
    follows: Arc<F>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<P, F, U> PostStoreService<P, F, U> {
    /// Create a new service. `clock` stamps the creation date of new posts.
    pub fn new(posts: Arc<P>, follows: Arc<F>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            posts,
            follows,
            users,
            clock,
        }
    }
}

impl<P, F, U> PostStoreService<P, F, U>
where
    P: PostRepository,
    F: FollowRepository,
    U: UserRepository,
{
    async fn lookup(&self, post_id: &str) -> Result<Option<AuthoredPost>, Error> {
        let Ok(id) = PostId::parse(post_id) else {
            return Ok(None);
        };
        self.posts.find_by_id(&id).await.map_err(map_post_error)
    }

    /// Resolve `post_id` to a post owned by `actor`.
    async fn owned_post(&self, actor: UserId, post_id: &str) -> Result<PostId, Error> {
        let found = self.lookup(post_id).await?;
        let owner = found.as_ref().map(|post| post.post.author);
        if let Err(error) = Ownership::of(Actor::User(actor), owner).require() {
            debug!(user_id = %actor, post_id, "post mutation refused");
            return Err(error);
        }
        found
            .map(|post| post.post.id)
            .ok_or_else(Error::authorization)
    }
}

#[async_trait]
impl<P, F, U> PostStore for PostStoreService<P, F, U>
where
    P: PostRepository,
    F: FollowRepository,
    U: UserRepository,
{
    async fn create(&self, actor: UserId, title: &str, body: &str) -> Result<PostId, Error> {
        let content = PostContent::parse(title, body).map_err(Error::validation)?;
        let post = Post {
            id: PostId::random(),
            content,
            created_date: self.clock.utc(),
            author: actor,
        };
        self.posts.insert(&post).await.map_err(map_post_error)?;
        debug!(user_id = %actor, post_id = %post.id, "post created");
        Ok(post.id)
    }

    async fn find_by_id(&self, post_id: &str, viewer: Actor) -> Result<PostView, Error> {
        self.lookup(post_id)
            .await?
            .map(|post| post.into_view(viewer))
            .ok_or_else(|| Error::not_found(POST_NOT_FOUND))
    }

    async fn update(
        &self,
        actor: UserId,
        post_id: &str,
        title: &str,
        body: &str,
    ) -> Result<UpdateOutcome, Error> {
        let id = self.owned_post(actor, post_id).await?;
        let content = match PostContent::parse(title, body) {
            Ok(content) => content,
            Err(errors) => return Ok(UpdateOutcome::Failure { errors }),
        };
        let changed = self
            .posts
            .update_content(&id, &content)
            .await
            .map_err(map_post_error)?;
        if changed {
            Ok(UpdateOutcome::Success)
        } else {
            Err(Error::authorization())
        }
    }

    async fn delete(&self, actor: UserId, post_id: &str) -> Result<(), Error> {
        let id = self.owned_post(actor, post_id).await?;
        let removed = self.posts.delete(&id).await.map_err(map_post_error)?;
        if removed {
            debug!(user_id = %actor, post_id = %id, "post deleted");
            Ok(())
        } else {
            Err(Error::authorization())
        }
    }

    async fn search(&self, term: &str, viewer: Actor) -> Result<Vec<PostView>, Error> {
        let term = SearchTerm::parse(term)
            .ok_or_else(|| Error::validation(vec![SearchTerm::INVALID_MESSAGE.to_owned()]))?;
        let found = self.posts.search(&term).await.map_err(map_post_error)?;
        Ok(views(found, viewer))
    }

    async fn find_by_author(&self, author: UserId, viewer: Actor) -> Result<Vec<PostView>, Error> {
        let found = self
            .posts
            .find_by_authors(&[author])
            .await
            .map_err(map_post_error)?;
        Ok(views(found, viewer))
    }

    async fn find_by_username(
        &self,
        username: &str,
        viewer: Actor,
    ) -> Result<Vec<PostView>, Error> {
        let Some(username) = Username::exact(username) else {
            return Err(Error::not_found(USER_NOT_FOUND));
        };
        let author = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;
        self.find_by_author(author.id(), viewer).await
    }

    async fn feed_for(&self, actor: UserId) -> Result<Vec<PostView>, Error> {
        let followed = self
            .follows
            .following_ids(&actor)
            .await
            .map_err(map_follow_error)?;
        if followed.is_empty() {
            return Ok(Vec::new());
        }
        let found = self
            .posts
            .find_by_authors(&followed)
            .await
            .map_err(map_post_error)?;
        Ok(views(found, Actor::User(actor)))
    }

    async fn count_by_author(&self, author: UserId) -> Result<u64, Error> {
        self.posts
            .count_by_author(&author)
            .await
            .map_err(map_post_error)
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
