//! Driving port assembling a user's public profile header.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Actor, Avatar, Error};

/// Profile header as shown to a visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    /// Normalised username.
    pub username: String,
    /// Derived avatar URL.
    pub avatar: Avatar,
    /// True when the visitor is looking at their own profile.
    pub is_visitors_profile: bool,
    /// True when the visitor follows this user.
    pub is_following: bool,
    /// Posts written by this user.
    pub post_count: u64,
    /// Users following this user.
    pub follower_count: u64,
    /// Users this user follows.
    pub following_count: u64,
}

/// Read-only profile lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Build the profile header for `username` as seen by `viewer`.
    async fn profile(&self, username: &str, viewer: Actor) -> Result<ProfileSummary, Error>;
}
