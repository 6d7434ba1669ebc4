//! User directory service.
//!
//! Implements [`UserDirectory`]: registration runs every shape rule, then the
//! uniqueness lookups for fields that passed, and reports all violations at
//! once. Hashing and verification run on the blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{
    DuplicateUserField, PasswordHasher, UserDirectory, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Error, Registration, RegistrationCheck, User, UserAccount, UserId, UserIdentity, Username,
};

const USERNAME_TAKEN: &str = "Username already exists.";
const EMAIL_TAKEN: &str = "Email already exists.";
pub(crate) const USER_NOT_FOUND: &str = "User not found.";

/// Map user repository failures onto domain errors.
///
/// A duplicate insert that slipped past the uniqueness lookups is reported
/// with the same message the lookup would have produced.
pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    if let Some(mapped) = error.store_failure() {
        return mapped;
    }
    match error {
        UserPersistenceError::Duplicate { field } => Error::validation(vec![
            match field {
                DuplicateUserField::Username => USERNAME_TAKEN,
                DuplicateUserField::Email => EMAIL_TAKEN,
            }
            .to_owned(),
        ]),
        other => Error::internal(other.to_string()),
    }
}

/// User directory service implementing the [`UserDirectory`] driving port.
#[derive(Clone)]
pub struct UserDirectoryService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> UserDirectoryService<U, H> {
    /// Create a new service over a user repository and password hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

impl<U, H> UserDirectoryService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn hash_password(&self, password: Zeroizing<String>) -> Result<String, Error> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(|err| Error::internal(err.to_string()))
    }

    async fn verify_password(&self, password: Zeroizing<String>, hash: String) -> bool {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(password.as_str(), &hash))
            .await
            .unwrap_or(false)
    }
}

#[async_trait]
impl<U, H> UserDirectory for UserDirectoryService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let RegistrationCheck {
            mut errors,
            username,
            email,
        } = registration.check();

        if let Some(username) = &username {
            let taken = self
                .users
                .username_exists(username.as_ref())
                .await
                .map_err(map_user_error)?;
            if taken {
                errors.push(USERNAME_TAKEN.to_owned());
            }
        }
        if let Some(email) = &email {
            let taken = self
                .users
                .email_exists(email.as_ref())
                .await
                .map_err(map_user_error)?;
            if taken {
                errors.push(EMAIL_TAKEN.to_owned());
            }
        }

        let (Some(username), Some(email), true) = (username, email, errors.is_empty()) else {
            debug!(violations = errors.len(), "registration rejected");
            return Err(Error::validation(errors));
        };

        let password_hash = self
            .hash_password(Zeroizing::new(registration.password().to_owned()))
            .await?;
        let user = User::new(UserId::random(), username, email);
        self.users
            .insert(&UserAccount {
                user: user.clone(),
                password_hash,
            })
            .await
            .map_err(map_user_error)?;

        debug!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<User, Error> {
        let Some(username) = Username::parse(username) else {
            debug!("authentication rejected: malformed username");
            return Err(Error::authentication());
        };
        let Some(account) = self
            .users
            .find_account_by_username(&username)
            .await
            .map_err(map_user_error)?
        else {
            debug!("authentication rejected: unknown username");
            return Err(Error::authentication());
        };

        let UserAccount {
            user,
            password_hash,
        } = account;
        if self
            .verify_password(Zeroizing::new(password.to_owned()), password_hash)
            .await
        {
            Ok(user)
        } else {
            debug!(user_id = %user.id(), "authentication rejected: password mismatch");
            Err(Error::authentication())
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<UserIdentity, Error> {
        let Some(username) = Username::exact(username) else {
            return Err(Error::not_found(USER_NOT_FOUND));
        };
        self.users
            .find_by_username(&username)
            .await
            .map_err(map_user_error)?
            .map(|user| user.identity())
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, Error> {
        self.users
            .username_exists(username)
            .await
            .map_err(map_user_error)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, Error> {
        self.users
            .email_exists(email)
            .await
            .map_err(map_user_error)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
