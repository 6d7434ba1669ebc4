//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature. Nothing
//! here touches a database or the network.

mod memory_store;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use sha2::{Digest, Sha256};

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{FollowGraphService, PostStoreService, ProfileService, UserDirectoryService};
use crate::inbound::http::state::HttpState;

pub use memory_store::InMemoryStore;

/// Clock frozen at a chosen instant until advanced.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Freeze the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Unsalted SHA-256 "hasher" that keeps tests fast.
///
/// Never use outside tests: equal passwords produce equal hashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePasswordHasher;

impl FixturePasswordHasher {
    const PREFIX: &'static str = "fixture$";
}

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!(
            "{}{}",
            Self::PREFIX,
            hex::encode(Sha256::digest(password.as_bytes()))
        ))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        self.hash(password).is_ok_and(|expected| expected == hash)
    }
}

/// Concrete user directory over the in-memory store.
pub type MemoryUserDirectory = UserDirectoryService<InMemoryStore, FixturePasswordHasher>;
/// Concrete follow graph over the in-memory store.
pub type MemoryFollowGraph = FollowGraphService<InMemoryStore, InMemoryStore>;
/// Concrete post store over the in-memory store.
pub type MemoryPostStore = PostStoreService<InMemoryStore, InMemoryStore, InMemoryStore>;
/// Concrete profile query over the in-memory store.
pub type MemoryProfiles = ProfileService<MemoryUserDirectory, MemoryFollowGraph, MemoryPostStore>;

/// Every service wired to one shared [`InMemoryStore`] and [`MutableClock`].
#[derive(Clone)]
pub struct InMemoryServices {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
    pub users: Arc<MemoryUserDirectory>,
    pub follows: Arc<MemoryFollowGraph>,
    pub posts: Arc<MemoryPostStore>,
    pub profiles: Arc<MemoryProfiles>,
}

impl InMemoryServices {
    /// Wire the services with the clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(MutableClock::new(now));
        let users = Arc::new(UserDirectoryService::new(
            Arc::clone(&store),
            Arc::new(FixturePasswordHasher),
        ));
        let follows = Arc::new(FollowGraphService::new(
            Arc::clone(&store),
            Arc::clone(&store),
        ));
        let posts = Arc::new(PostStoreService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&clock) as Arc<dyn Clock>,
        ));
        let profiles = Arc::new(ProfileService::new(
            Arc::clone(&users),
            Arc::clone(&follows),
            Arc::clone(&posts),
        ));
        Self {
            store,
            clock,
            users,
            follows,
            posts,
            profiles,
        }
    }

    /// HTTP handler state backed by these services.
    pub fn http_state(&self) -> HttpState {
        HttpState::new(
            Arc::clone(&self.users) as _,
            Arc::clone(&self.follows) as _,
            Arc::clone(&self.posts) as _,
            Arc::clone(&self.profiles) as _,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    fn fixture_hasher_verifies_only_matching_passwords() {
        let hasher = FixturePasswordHasher;
        let hash = hasher.hash("hunter2hunter2").expect("hash");

        assert!(hash.starts_with(FixturePasswordHasher::PREFIX));
        assert!(hasher.verify("hunter2hunter2", &hash));
        assert!(!hasher.verify("hunter2hunter3", &hash));
    }

    #[rstest]
    fn mutable_clock_advances() {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
            .single()
            .expect("timestamp");
        let clock = MutableClock::new(start);
        clock.advance_seconds(90);
        assert_eq!(clock.utc(), start + TimeDelta::seconds(90));
    }
}
