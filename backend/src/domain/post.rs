//! Post data model.
//!
//! Title and body are sanitised and trimmed before validation; what reaches
//! storage is always markup-free. Author and creation time are fixed at
//! creation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::validation::sanitize_markup;
use super::{Actor, User, UserId, UserSummary};

/// Stable post identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "0b9c9b7e-4f57-4a55-9a53-29b3c0b5a0f1")]
pub struct PostId(Uuid);

/// Error returned when a post identifier is not a well-formed UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("post id must be a valid UUID")]
pub struct InvalidPostId;

impl PostId {
    /// Parse a post identifier supplied by a caller.
    pub fn parse(raw: &str) -> Result<Self, InvalidPostId> {
        if raw.trim() != raw {
            return Err(InvalidPostId);
        }
        Uuid::parse_str(raw).map(Self).map_err(|_| InvalidPostId)
    }

    /// Generate a new random [`PostId`].
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

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<PostId> for String {
    fn from(value: PostId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for PostId {
    type Error = InvalidPostId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Sanitised, non-empty title and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent {
    title: String,
    body: String,
}

impl PostContent {
    /// Sanitise raw input and validate it, collecting every violation.
    ///
    /// # Examples
    /// ```
    /// use postapp::domain::PostContent;
    ///
    /// let content = PostContent::parse(" <b>Hi</b> ", "there").expect("valid");
    /// assert_eq!(content.title(), "Hi");
    ///
    /// let errors = PostContent::parse("", "<i></i>").expect_err("empty");
    /// assert_eq!(errors.len(), 2);
    /// ```
    pub fn parse(raw_title: &str, raw_body: &str) -> Result<Self, Vec<String>> {
        let title = sanitize_markup(raw_title);
        let body = sanitize_markup(raw_body);

        let mut errors = Vec::new();
        if title.is_empty() {
            errors.push("You must provide a title.".to_owned());
        }
        if body.is_empty() {
            errors.push("You must provide post content.".to_owned());
        }

        if errors.is_empty() {
            Ok(Self { title, body })
        } else {
            Err(errors)
        }
    }

    /// Wrap content read from storage.
    pub(crate) fn from_trusted(title: String, body: String) -> Self {
        Self { title, body }
    }

    /// Sanitised title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Sanitised body.
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Stored post.
///
/// ## Invariants
/// - `content` is markup-free and non-empty.
/// - `author` and `created_date` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Stable identifier.
    pub id: PostId,
    /// Sanitised title and body.
    pub content: PostContent,
    /// Creation timestamp.
    pub created_date: DateTime<Utc>,
    /// Owning user.
    pub author: UserId,
}

/// A post joined to its author's current record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoredPost {
    /// The stored post.
    pub post: Post,
    /// The author as currently stored.
    pub author: User,
}

impl AuthoredPost {
    /// Enrich for `viewer`: derive the avatar, compute ownership and drop the
    /// raw author id.
    pub fn into_view(self, viewer: Actor) -> PostView {
        let Self { post, author } = self;
        PostView {
            id: post.id,
            title: post.content.title,
            body: post.content.body,
            created_date: post.created_date,
            author: author.summary(),
            is_owner: viewer.owns(post.author),
        }
    }
}

/// Post as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    /// Stable identifier.
    pub id: PostId,
    /// Sanitised title.
    pub title: String,
    /// Sanitised body.
    pub body: String,
    /// Creation timestamp.
    pub created_date: DateTime<Utc>,
    /// Author username and avatar.
    pub author: UserSummary,
    /// True iff the viewer authored the post.
    pub is_owner: bool,
}

/// Result of an update by the post's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum UpdateOutcome {
    /// Title and body were replaced.
    Success,
    /// Input failed validation; nothing was changed.
    Failure {
        /// Every violated rule.
        errors: Vec<String>,
    },
}

/// Non-empty full-text search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Message reported for blank or missing terms.
    pub const INVALID_MESSAGE: &'static str = "Search term must be a non-empty string.";

    /// Accept any term that still has content once trimmed.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for SearchTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
