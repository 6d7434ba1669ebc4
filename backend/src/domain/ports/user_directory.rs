//! Driving port for account registration, sign-in and user lookups.

use async_trait::async_trait;

use crate::domain::{Error, Registration, User, UserIdentity};

/// Use-cases exposed to inbound adapters for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Validate and persist a new account.
    ///
    /// Fails with a validation error listing every violated rule; nothing is
    /// stored in that case.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Check credentials. Unknown users and wrong passwords fail identically.
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, Error>;

    /// Resolve a username to `{id, username, avatar}`. Matching is exact.
    async fn find_by_username(&self, username: &str) -> Result<UserIdentity, Error>;

    /// True when `username` is taken, compared exactly.
    async fn username_exists(&self, username: &str) -> Result<bool, Error>;

    /// True when `email` is taken, compared exactly.
    async fn email_exists(&self, email: &str) -> Result<bool, Error>;
}
