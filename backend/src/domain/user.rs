//! User data model.
//!
//! Usernames and emails are normalised (trimmed, lowercased) before any rule
//! runs. Avatars are derived from the email on every read and never stored.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::validation::{
    has_length_between, is_alphanumeric, is_non_empty_trimmed, is_valid_email,
};

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 30;
/// Minimum allowed length for a password.
pub const PASSWORD_MIN: usize = 12;
/// Maximum allowed length for a password.
pub const PASSWORD_MAX: usize = 50;

const AVATAR_BASE_URL: &str = "https://gravatar.com/avatar/";
const AVATAR_SIZE: u16 = 128;

/// Error returned when a user identifier cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("user id must be a valid UUID")]
pub struct InvalidUserId;

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its canonical string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, InvalidUserId> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(InvalidUserId);
        }
        Uuid::parse_str(raw).map(Self).map_err(|_| InvalidUserId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID read from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = InvalidUserId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Trim and lowercase a raw username or email.
pub fn normalize_identity(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalised account name: lowercase, trimmed, alphanumeric, 3 to 30 chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Normalise `raw` and keep it only if it satisfies every username rule.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_identity(raw);
        is_well_formed_username(&normalized).then_some(Self(normalized))
    }

    /// Keep `raw` only when it is already in stored form. Lookups by name
    /// match exactly, so `"Ada"` never resolves to `ada`.
    pub fn exact(raw: &str) -> Option<Self> {
        (normalize_identity(raw) == raw && is_well_formed_username(raw))
            .then(|| Self(raw.to_owned()))
    }

    /// Wrap a username read from storage.
    pub(crate) fn from_trusted(value: String) -> Self {
        Self(value)
    }
}

fn is_well_formed_username(normalized: &str) -> bool {
    is_alphanumeric(normalized) && has_length_between(normalized, USERNAME_MIN, USERNAME_MAX)
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalised email address: lowercase, trimmed, well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise `raw` and keep it only if it is a valid address.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_identity(raw);
        is_valid_email(&normalized).then_some(Self(normalized))
    }

    /// Wrap an email read from storage.
    pub(crate) fn from_trusted(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Image URL derived from a hash of the lowercased email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "https://gravatar.com/avatar/5f2b...?s=128")]
pub struct Avatar(String);

impl Avatar {
    /// Derive the avatar URL for an email. Pure; performs no I/O.
    ///
    /// # Examples
    /// ```
    /// use postapp::domain::Avatar;
    ///
    /// assert_eq!(
    ///     Avatar::for_email(" Ada@Example.com "),
    ///     Avatar::for_email("ada@example.com"),
    /// );
    /// ```
    pub fn for_email(email: &str) -> Self {
        let digest = Sha256::digest(normalize_identity(email).as_bytes());
        Self(format!(
            "{AVATAR_BASE_URL}{}?s={AVATAR_SIZE}",
            hex::encode(digest)
        ))
    }
}

impl AsRef<str> for Avatar {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Registered account as known to the domain.
///
/// ## Invariants
/// - `username` and `email` are each unique across all users.
/// - The password hash never leaves the persistence adapters except inside
///   [`UserAccount`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(id: UserId, username: Username, email: EmailAddress) -> Self {
        Self {
            id,
            username,
            email,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Normalised username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Normalised email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Avatar derived from the current email.
    pub fn avatar(&self) -> Avatar {
        Avatar::for_email(self.email.as_ref())
    }

    /// Public `{username, avatar}` view.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            username: self.username.to_string(),
            avatar: self.avatar(),
        }
    }

    /// Public `{id, username, avatar}` view.
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.id,
            username: self.username.to_string(),
            avatar: self.avatar(),
        }
    }
}

/// A stored user together with its password hash.
#[derive(Debug, Clone)]
pub struct UserAccount {
    /// The account's public identity.
    pub user: User,
    /// PHC-formatted password hash.
    pub password_hash: String,
}

/// Author or follower as shown to other users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Normalised username.
    #[schema(example = "ada")]
    pub username: String,
    /// Derived avatar URL.
    pub avatar: Avatar,
}

/// Result of a username lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// Stable user identifier.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    /// Normalised username.
    #[schema(example = "ada")]
    pub username: String,
    /// Derived avatar URL.
    pub avatar: Avatar,
}

/// Registration input after normalisation.
///
/// Holds the raw password in a zeroizing buffer until it is hashed.
#[derive(Debug, Clone)]
pub struct Registration {
    username: String,
    email: String,
    password: Zeroizing<String>,
}

/// Outcome of the shape checks on a [`Registration`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrationCheck {
    /// Every violated shape rule, in detection order.
    pub errors: Vec<String>,
    /// Set when the username passed its shape rules and may be looked up.
    pub username: Option<Username>,
    /// Set when the email passed its shape rule and may be looked up.
    pub email: Option<EmailAddress>,
}

impl Registration {
    /// Normalise raw registration input. Never fails.
    pub fn normalize(username: &str, email: &str, password: &str) -> Self {
        Self {
            username: normalize_identity(username),
            email: normalize_identity(email),
            password: Zeroizing::new(password.to_owned()),
        }
    }

    /// Normalised username, possibly invalid.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Normalised email, possibly invalid.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Raw password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Run every shape rule and collect all violations.
    pub fn check(&self) -> RegistrationCheck {
        let mut errors = Vec::new();
        let username = self.username.as_str();
        let password_length = self.password.chars().count();
        let username_length = username.chars().count();

        if !is_non_empty_trimmed(username) {
            errors.push("You have to provide a username.".to_owned());
        }
        if !username.is_empty() && !is_alphanumeric(username) {
            errors.push("Username can only consist of letters and numbers.".to_owned());
        }
        if !is_valid_email(&self.email) {
            errors.push("You have to provide a valid email.".to_owned());
        }
        if self.password.is_empty() {
            errors.push("You have to provide a password.".to_owned());
        }
        if password_length > 0 && password_length < PASSWORD_MIN {
            errors.push(format!(
                "Password has to be at least {PASSWORD_MIN} characters."
            ));
        }
        if password_length > PASSWORD_MAX {
            errors.push(format!("Password cannot exceed {PASSWORD_MAX} characters."));
        }
        if username_length > 0 && username_length < USERNAME_MIN {
            errors.push(format!(
                "Username has to be at least {USERNAME_MIN} characters."
            ));
        }
        if username_length > USERNAME_MAX {
            errors.push(format!("Username cannot exceed {USERNAME_MAX} characters."));
        }

        RegistrationCheck {
            errors,
            username: Username::parse(username),
            email: EmailAddress::parse(&self.email),
        }
    }
}
