//! Driven port for user account persistence.

use async_trait::async_trait;

use crate::domain::{User, UserAccount, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError for "user repository" {
        /// A unique constraint rejected the insert.
        Duplicate { field: DuplicateUserField } => "user repository rejected duplicate {field}",
    }
}

/// Unique column that rejected an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateUserField {
    /// `users.username`.
    Username,
    /// `users.email`.
    Email,
}

impl std::fmt::Display for DuplicateUserField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Username => "username",
            Self::Email => "email",
        })
    }
}

/// Storage for registered accounts.
///
/// Lookups match the normalised (lowercase) values exactly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account. Unique violations surface as
    /// [`UserPersistenceError::Duplicate`].
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError>;

    /// Fetch an account together with its password hash.
    async fn find_account_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Fetch a user by exact username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// True when a stored username equals `username`.
    async fn username_exists(&self, username: &str) -> Result<bool, UserPersistenceError>;

    /// True when a stored email equals `email`.
    async fn email_exists(&self, email: &str) -> Result<bool, UserPersistenceError>;
}
