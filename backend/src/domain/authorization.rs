//! Identity and ownership checks shared by the post and follow flows.
//!
//! Refusals are reported with [`Error::authorization`], which deliberately
//! looks the same whether the resource is missing or owned by someone else.

use super::{Error, UserId};

/// The identity initiating an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Actor {
    /// Unauthenticated visitor.
    #[default]
    Anonymous,
    /// Signed-in user.
    User(UserId),
}

impl Actor {
    /// Build an actor from an optional session user id.
    pub fn from_session(user_id: Option<UserId>) -> Self {
        user_id.map_or(Self::Anonymous, Self::User)
    }

    /// The signed-in user's id, if any.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(*id),
        }
    }

    /// True iff this actor is the signed-in user `owner`.
    ///
    /// Anonymous actors own nothing.
    pub fn owns(&self, owner: UserId) -> bool {
        self.user_id() == Some(owner)
    }
}

/// Outcome of an ownership check against a possibly missing resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The actor owns the resource.
    Owner,
    /// The resource exists but belongs to someone else.
    NotOwner,
    /// No such resource, or its identifier was malformed.
    Missing,
}

impl Ownership {
    /// Classify a lookup result for `actor`.
    pub fn of(actor: Actor, owner: Option<UserId>) -> Self {
        match owner {
            None => Self::Missing,
            Some(owner) if actor.owns(owner) => Self::Owner,
            Some(_) => Self::NotOwner,
        }
    }

    /// Succeed only for [`Ownership::Owner`]; both refusals share one error.
    pub fn require(self) -> Result<(), Error> {
        match self {
            Self::Owner => Ok(()),
            Self::NotOwner | Self::Missing => Err(Error::authorization()),
        }
    }
}
