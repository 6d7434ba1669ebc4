//! In-memory store implementing every driven repository port.
//!
//! One store backs users, follows and posts so joins behave as they do in
//! PostgreSQL: post reads see the author's current row, and follower lists
//! resolve to stored users.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    DuplicateUserField, FollowRepository, FollowRepositoryError, PostRepository,
    PostRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthoredPost, FollowEdge, Post, PostContent, PostId, SearchTerm, User, UserAccount, UserId,
    Username,
};

#[derive(Default)]
struct StoreState {
    accounts: Vec<UserAccount>,
    follows: Vec<FollowEdge>,
    posts: Vec<Post>,
    unavailable: bool,
}

impl StoreState {
    fn user(&self, id: UserId) -> Option<&User> {
        self.accounts
            .iter()
            .map(|account| &account.user)
            .find(|user| user.id() == id)
    }

    fn authored(&self, post: &Post) -> Option<AuthoredPost> {
        self.user(post.author).map(|author| AuthoredPost {
            post: post.clone(),
            author: author.clone(),
        })
    }

    fn users_for(&self, ids: impl Iterator<Item = UserId>) -> Vec<User> {
        ids.filter_map(|id| self.user(id).cloned()).collect()
    }
}

/// Shared in-memory users, follows and posts.
///
/// [`InMemoryStore::set_unavailable`] makes every call fail with a
/// `Connection` error, mimicking a database outage.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the simulated outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Number of stored posts.
    pub fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    /// Stored copy of a post, bypassing read-time enrichment.
    pub fn stored_post(&self, id: PostId) -> Option<Post> {
        self.lock().posts.iter().find(|post| post.id == id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn available<E>(
        &self,
        outage: impl FnOnce(&'static str) -> E,
    ) -> Result<MutexGuard<'_, StoreState>, E> {
        let state = self.lock();
        if state.unavailable {
            return Err(outage("in-memory store offline"));
        }
        Ok(state)
    }

    fn users(&self) -> Result<MutexGuard<'_, StoreState>, UserPersistenceError> {
        self.available(UserPersistenceError::connection)
    }

    fn edges(&self) -> Result<MutexGuard<'_, StoreState>, FollowRepositoryError> {
        self.available(FollowRepositoryError::connection)
    }

    fn posts(&self) -> Result<MutexGuard<'_, StoreState>, PostRepositoryError> {
        self.available(PostRepositoryError::connection)
    }
}

fn to_count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

/// Relevance of a post for `term`: the number of occurrences of its words in
/// the title and body, ignoring case. `None` unless every word occurs.
fn relevance(content: &PostContent, term: &SearchTerm) -> Option<usize> {
    let haystack = format!("{} {}", content.title(), content.body()).to_lowercase();
    term.as_ref()
        .to_lowercase()
        .split_whitespace()
        .map(|word| Some(haystack.matches(word).count()).filter(|hits| *hits > 0))
        .sum()
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut state = self.users()?;
        let user = &account.user;
        for existing in state.accounts.iter().map(|stored| &stored.user) {
            if existing.username() == user.username() {
                return Err(UserPersistenceError::duplicate(DuplicateUserField::Username));
            }
            if existing.email() == user.email() {
                return Err(UserPersistenceError::duplicate(DuplicateUserField::Email));
            }
        }
        state.accounts.push(account.clone());
        Ok(())
    }

    async fn find_account_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self
            .users()?
            .accounts
            .iter()
            .find(|account| account.user.username() == username)
            .cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .find_account_by_username(username)
            .await?
            .map(|account| account.user))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.users()?.user(*id).cloned())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, UserPersistenceError> {
        Ok(self
            .users()?
            .accounts
            .iter()
            .any(|account| account.user.username().as_ref() == username))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, UserPersistenceError> {
        Ok(self
            .users()?
            .accounts
            .iter()
            .any(|account| account.user.email().as_ref() == email))
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn insert(&self, edge: &FollowEdge) -> Result<(), FollowRepositoryError> {
        let mut state = self.edges()?;
        if edge.is_self_edge() {
            return Err(FollowRepositoryError::query("follows_not_self violated"));
        }
        if state.follows.contains(edge) {
            return Err(FollowRepositoryError::duplicate());
        }
        state.follows.push(*edge);
        Ok(())
    }

    async fn delete(&self, edge: &FollowEdge) -> Result<bool, FollowRepositoryError> {
        let mut state = self.edges()?;
        let before = state.follows.len();
        state.follows.retain(|stored| stored != edge);
        Ok(state.follows.len() < before)
    }

    async fn exists(&self, edge: &FollowEdge) -> Result<bool, FollowRepositoryError> {
        Ok(self.edges()?.follows.contains(edge))
    }

    async fn followers_of(&self, user: &UserId) -> Result<Vec<User>, FollowRepositoryError> {
        let state = self.edges()?;
        let ids = state
            .follows
            .iter()
            .filter(|edge| edge.following == *user)
            .map(|edge| edge.follower);
        Ok(state.users_for(ids))
    }

    async fn following_of(&self, user: &UserId) -> Result<Vec<User>, FollowRepositoryError> {
        let state = self.edges()?;
        let ids = state
            .follows
            .iter()
            .filter(|edge| edge.follower == *user)
            .map(|edge| edge.following);
        Ok(state.users_for(ids))
    }

    async fn following_ids(&self, user: &UserId) -> Result<Vec<UserId>, FollowRepositoryError> {
        Ok(self
            .edges()?
            .follows
            .iter()
            .filter(|edge| edge.follower == *user)
            .map(|edge| edge.following)
            .collect())
    }

    async fn follower_count(&self, user: &UserId) -> Result<u64, FollowRepositoryError> {
        Ok(to_count(
            self.edges()?
                .follows
                .iter()
                .filter(|edge| edge.following == *user)
                .count(),
        ))
    }

    async fn following_count(&self, user: &UserId) -> Result<u64, FollowRepositoryError> {
        Ok(to_count(
            self.edges()?
                .follows
                .iter()
                .filter(|edge| edge.follower == *user)
                .count(),
        ))
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut state = self.posts()?;
        if state.user(post.author).is_none() {
            return Err(PostRepositoryError::query("posts_author_id_fkey violated"));
        }
        state.posts.push(post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<AuthoredPost>, PostRepositoryError> {
        let state = self.posts()?;
        Ok(state
            .posts
            .iter()
            .find(|post| post.id == *id)
            .and_then(|post| state.authored(post)))
    }

    async fn update_content(
        &self,
        id: &PostId,
        content: &PostContent,
    ) -> Result<bool, PostRepositoryError> {
        let mut state = self.posts()?;
        let Some(post) = state.posts.iter_mut().find(|post| post.id == *id) else {
            return Ok(false);
        };
        post.content = content.clone();
        Ok(true)
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostRepositoryError> {
        let mut state = self.posts()?;
        let before = state.posts.len();
        state.posts.retain(|post| post.id != *id);
        Ok(state.posts.len() < before)
    }

    async fn search(&self, term: &SearchTerm) -> Result<Vec<AuthoredPost>, PostRepositoryError> {
        let state = self.posts()?;
        let mut ranked: Vec<_> = state
            .posts
            .iter()
            .filter_map(|post| Some((relevance(&post.content, term)?, state.authored(post)?)))
            .collect();
        ranked.sort_by(|(a_rank, a), (b_rank, b)| {
            b_rank
                .cmp(a_rank)
                .then_with(|| b.post.created_date.cmp(&a.post.created_date))
        });
        Ok(ranked.into_iter().map(|(_, post)| post).collect())
    }

    async fn find_by_authors(
        &self,
        authors: &[UserId],
    ) -> Result<Vec<AuthoredPost>, PostRepositoryError> {
        let state = self.posts()?;
        let mut found: Vec<_> = state
            .posts
            .iter()
            .filter(|post| authors.contains(&post.author))
            .filter_map(|post| state.authored(post))
            .collect();
        found.sort_by(|a, b| b.post.created_date.cmp(&a.post.created_date));
        Ok(found)
    }

    async fn count_by_author(&self, author: &UserId) -> Result<u64, PostRepositoryError> {
        Ok(to_count(
            self.posts()?
                .posts
                .iter()
                .filter(|post| post.author == *author)
                .count(),
        ))
    }
}
